use thiserror::Error;

/// Rejection of an endpoint configuration. A monitor is never built from a
/// config that produced one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Unsupported protocol: {0}. Only http:// and https:// are supported")]
    UnsupportedScheme(String),
    #[error("Invalid interval: must be a positive number of seconds (got: {0})")]
    InvalidInterval(u64),
    #[error("Invalid timeout: must be a positive number of milliseconds (got: {0})")]
    InvalidTimeout(u64),
    #[error("Invalid status code: {0} (must be 100-599)")]
    InvalidStatus(u16),
    #[error("Expected status set cannot be empty")]
    EmptyStatusSet,
    #[error("Invalid method: {0}. Must be one of: GET, POST, PUT, PATCH, DELETE, HEAD")]
    InvalidMethod(String),
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
