//! Built-in defaults and configuration layering.

use serde::{Deserialize, Serialize};

use super::types::MonitorConfig;

pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;
pub const DEFAULT_DEGRADED_THRESHOLD_MS: u64 = 2_000;
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 0;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// File-level defaults applied to every monitor that leaves a field unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_degraded_threshold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_retry_delay: Option<u64>,
}

/// Layer `defaults` under `monitor`. Values set on the monitor always win;
/// anything still unset afterwards falls back to the built-in defaults when
/// the config is resolved.
pub fn merge_with_defaults(monitor: MonitorConfig, defaults: &ConfigDefaults) -> MonitorConfig {
    MonitorConfig {
        interval: monitor.interval.or(defaults.default_interval),
        timeout: monitor.timeout.or(defaults.default_timeout),
        degraded_threshold: monitor.degraded_threshold.or(defaults.default_degraded_threshold),
        max_retries: monitor.max_retries.or(defaults.default_max_retries),
        retry_delay: monitor.retry_delay.or(defaults.default_retry_delay),
        ..monitor
    }
}
