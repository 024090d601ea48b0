//! Endpoint configuration for upstatus.
//!
//! Raw [`MonitorConfig`] values (from the CLI or a config file) are layered
//! over file-level [`ConfigDefaults`] and the built-in defaults, then validated
//! into an immutable [`EndpointConfig`].

mod defaults;
mod methods;
mod types;
pub mod validation;

pub use defaults::{
    ConfigDefaults, DEFAULT_CONTENT_TYPE, DEFAULT_DEGRADED_THRESHOLD_MS, DEFAULT_EXPECTED_STATUS,
    DEFAULT_INTERVAL_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_MS, merge_with_defaults,
};
pub use types::{EndpointConfig, ExpectedStatus, HttpMethod, MonitorConfig};
