use std::{fmt, fs, path};

use serde::{Deserialize, Serialize};
use upstatus::{ConfigDefaults, MonitorConfig, config::merge_with_defaults};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFailed { path: path::PathBuf, source: std::io::Error },
    #[error("Failed to parse config file {}: {reason}", path.display())]
    ParseFailed { path: path::PathBuf, reason: String },
    #[error("Config file must have a monitors array")]
    NoMonitors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

/// Monitors file: a `monitors` list plus optional file-wide defaults.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitors: Vec<MonitorConfig>,
    #[serde(flatten)]
    pub defaults: ConfigDefaults,
}

/// `.toml` files are TOML, anything else is read as JSON
fn format_of(path: &path::Path) -> Format {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
        _ => Format::Json,
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_1 = |f: &mut fmt::Formatter<'_>, label: &str, value: Option<u64>| match value {
            Some(value) => writeln!(f, "  {label}: {value}"),
            None => Ok(()),
        };

        writeln!(f, "Loaded {} monitors", self.monitors.len())?;
        write_1(f, "Default Interval (s)", self.defaults.default_interval)?;
        write_1(f, "Default Timeout (ms)", self.defaults.default_timeout)?;
        write_1(f, "Default Degraded Threshold (ms)", self.defaults.default_degraded_threshold)?;
        write_1(f, "Default Max Retries", self.defaults.default_max_retries.map(u64::from))?;
        write_1(f, "Default Retry Delay (ms)", self.defaults.default_retry_delay)?;

        Ok(())
    }
}

impl Config {
    /// Read a monitors file. Fails when the file has no monitors.
    pub fn from_file(path: impl AsRef<path::Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| Error::ReadFailed { path: path.to_path_buf(), source })?;

        let config = Self::parse(&raw, format_of(path))
            .map_err(|reason| Error::ParseFailed { path: path.to_path_buf(), reason })?;

        if config.monitors.is_empty() {
            return Err(Error::NoMonitors);
        }
        Ok(config)
    }

    fn parse(raw: &str, format: Format) -> Result<Self, String> {
        match format {
            Format::Json => serde_json::from_str(raw).map_err(|err| err.to_string()),
            Format::Toml => toml::from_str(raw).map_err(|err| err.to_string()),
        }
    }

    /// Every configured monitor with the file defaults layered underneath
    pub fn monitor_configs(&self) -> Vec<MonitorConfig> {
        self.monitors
            .iter()
            .cloned()
            .map(|monitor| merge_with_defaults(monitor, &self.defaults))
            .collect()
    }

    /// Layer the file defaults under a monitor built from CLI flags
    pub fn apply_defaults(&self, monitor: MonitorConfig) -> MonitorConfig {
        merge_with_defaults(monitor, &self.defaults)
    }
}
