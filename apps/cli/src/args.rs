use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use upstatus::{HttpMethod, MonitorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// UpStatus - simple uptime monitor
#[derive(Debug, Parser)]
#[command(name = "upstatus", version, about)]
#[command(after_help = "Examples:\n  \
    upstatus https://api.example.com\n  \
    upstatus https://site1.com https://site2.com -i 60\n  \
    upstatus https://api.example.com -m POST -b '{\"key\":\"value\"}'\n  \
    upstatus https://api.example.com --export json -o results.json")]
pub struct Args {
    /// URLs to monitor (bare hostnames get https://)
    pub urls: Vec<String>,

    /// Check interval in seconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Request timeout in milliseconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Response time above which a check is degraded, in milliseconds
    #[arg(short, long)]
    pub degraded_threshold: Option<u64>,

    /// Acceptable status code (repeat for several)
    #[arg(
        short = 's',
        long = "expected-status",
        value_parser = clap::value_parser!(u16).range(100..=599)
    )]
    pub expected_status: Vec<u16>,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD)
    #[arg(short, long)]
    pub method: Option<HttpMethod>,

    /// Request body (sent for POST/PUT/PATCH)
    #[arg(short, long)]
    pub body: Option<String>,

    /// Content type of the request body
    #[arg(long)]
    pub content_type: Option<String>,

    /// Static request header as KEY:VALUE (repeat for several)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Report redirects as failures instead of following them
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Maximum redirects to follow
    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// Retries after a transport failure
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Base retry delay in milliseconds, doubled per retry
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// JSON or TOML file with a `monitors` list
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Export final statistics on shutdown
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Write the export to a file instead of stdout
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,

    /// Print statistics as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Print statistics every N check intervals
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub report_every: u32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Raw config for `url` carrying every flag given on the command line.
    /// Flags left out stay unset so config-file defaults can fill them.
    pub fn monitor_config(&self, url: &str) -> MonitorConfig {
        let mut config = MonitorConfig::new(url);
        config.interval = self.interval;
        config.timeout = self.timeout;
        config.degraded_threshold = self.degraded_threshold;
        config.method = self.method.map(|m| m.as_str().to_string());
        config.body = self.body.clone();
        config.content_type = self.content_type.clone();
        config.max_redirects = self.max_redirects;
        config.max_retries = self.retries;
        config.retry_delay = self.retry_delay;

        if !self.expected_status.is_empty() {
            config.expected_status = Some(self.expected_status.clone().into());
        }
        if !self.headers.is_empty() {
            config.headers = Some(self.headers.iter().cloned().collect());
        }
        if self.no_follow_redirects {
            config.follow_redirects = Some(false);
        }

        config
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (key, value) =
        raw.split_once(':').ok_or_else(|| format!("header must be KEY:VALUE (got: {raw})"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("header name cannot be empty (got: {raw})"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
