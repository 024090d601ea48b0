mod args;
mod config;
mod render;

use std::{fs, time::Duration};

use anyhow::{Context, bail};
use clap::Parser;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{info, warn};
use upstatus::{MonitorRegistry, MonitorStats, export};

use crate::args::{Args, ExportFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_with_level(logger::level_for_verbosity(args.verbose));

    let registry = build_registry(&args).await?;
    if registry.is_empty() {
        bail!("No valid URLs to monitor. Pass URLs or --config <FILE>; see --help");
    }

    registry.start_all().await;

    let report_every = registry
        .min_interval()
        .unwrap_or(Duration::from_secs(upstatus::config::DEFAULT_INTERVAL_SECS))
        * args.report_every;
    let mut reports = interval_at(Instant::now() + report_every, report_every);
    reports.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Press Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = reports.tick() => print_stats(&registry.snapshot(), args.json)?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                break;
            }
        }
    }

    warn!("Shutting down...");
    registry.stop_all().await;

    let snapshot = registry.snapshot();
    if !args.json {
        println!("\nFinal Statistics");
    }
    print_stats(&snapshot, args.json)?;

    if let Some(format) = args.export {
        export_stats(&snapshot, format, &args)?;
    }

    Ok(())
}

/// Register CLI URLs and config-file monitors.
///
/// Invalid CLI URLs are skipped with a warning; an invalid config file is fatal.
async fn build_registry(args: &Args) -> anyhow::Result<MonitorRegistry> {
    let file = args
        .config
        .as_ref()
        .map(config::Config::from_file)
        .transpose()?;

    let registry = MonitorRegistry::new();

    for url in &args.urls {
        let mut monitor = args.monitor_config(url);
        if let Some(file) = &file {
            monitor = file.apply_defaults(monitor);
        }
        if let Err(err) = registry.add(monitor).await {
            warn!("Skipping {url}: {err}");
        }
    }

    if let Some(file) = &file {
        info!("{}", file.to_string().trim_end());
        for monitor in file.monitor_configs() {
            let url = monitor.url.clone();
            registry
                .add(monitor)
                .await
                .with_context(|| format!("Invalid monitor {url} in config"))?;
        }
    }

    Ok(registry)
}

fn print_stats(stats: &[MonitorStats], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", export::to_json(stats)?);
    } else {
        print!("{}", render::table(stats));
    }
    Ok(())
}

fn export_stats(stats: &[MonitorStats], format: ExportFormat, args: &Args) -> anyhow::Result<()> {
    let data = match format {
        ExportFormat::Json => export::to_json(stats)?,
        ExportFormat::Csv => export::to_csv(stats),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, data)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            info!("Exported statistics to {}", path.display());
        }
        None => println!("{data}"),
    }
    Ok(())
}
