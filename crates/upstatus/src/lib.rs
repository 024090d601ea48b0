//! upstatus - concurrent HTTP uptime monitoring
//!
//! This library polls HTTP endpoints on independent schedules, classifies each
//! check as up, degraded or down, and keeps a rolling reliability window per
//! endpoint that callers can snapshot for display or export.

pub mod config;
pub mod error;
pub mod export;
pub mod monitoring;

// Re-export main types
pub use config::{ConfigDefaults, EndpointConfig, ExpectedStatus, HttpMethod, MonitorConfig};
pub use error::{ConfigError, MonitorError};
pub use monitoring::{
    CheckResult, Checker, EndpointMonitor, HttpChecker, MonitorRegistry, MonitorStats,
    MonitorStatus, ProbeResponse, TransportError, TransportErrorKind,
};

/// Result type for monitor construction
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Number of check results retained per endpoint
pub const HISTORY_CAPACITY: usize = 100;
