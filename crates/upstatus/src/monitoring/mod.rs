/// Monitoring engine module - checks endpoints and tracks their reliability
///
/// This module is responsible for:
/// - Executing HTTP/HTTPS checks with timeout and retry
/// - Classifying results as up, degraded or down
/// - Keeping a rolling stats window per endpoint
/// - Scheduling and cancelling per-endpoint check loops
pub mod checker;
pub mod monitor;
pub mod registry;
pub mod stats;
pub mod transport;
pub mod types;

pub use checker::{Checker, HttpChecker, ProbeResponse};
pub use monitor::{EndpointMonitor, classify};
pub use registry::MonitorRegistry;
pub use stats::MonitorStats;
pub use transport::{TransportError, TransportErrorKind};
pub use types::{CheckResult, MonitorStatus};
