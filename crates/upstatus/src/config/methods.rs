//! Builder and resolution methods for monitor configuration.

use super::defaults::{
    DEFAULT_CONTENT_TYPE, DEFAULT_DEGRADED_THRESHOLD_MS, DEFAULT_INTERVAL_SECS,
    DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
use super::types::{EndpointConfig, ExpectedStatus, HttpMethod, MonitorConfig};
use super::validation::{
    host_of, validate_interval, validate_status, validate_timeout, validate_url,
};
use crate::error::ConfigError;

impl MonitorConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }

    /// Set an explicit display name (also used as the registry key)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the poll interval in seconds
    pub fn with_interval(mut self, seconds: u64) -> Self {
        self.interval = Some(seconds);
        self
    }

    /// Set the per-request timeout in milliseconds
    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn with_expected_status(mut self, expected: impl Into<ExpectedStatus>) -> Self {
        self.expected_status = Some(expected.into());
        self
    }

    /// Set the degraded response-time threshold in milliseconds
    pub fn with_degraded_threshold(mut self, millis: u64) -> Self {
        self.degraded_threshold = Some(millis);
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method.as_str().to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Add a static request header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Default::default).insert(key.into(), value.into());
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }

    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Set the retry policy: `max_retries` extra attempts, backing off from `delay_ms`
    pub fn with_retries(mut self, max_retries: u32, delay_ms: u64) -> Self {
        self.max_retries = Some(max_retries);
        self.retry_delay = Some(delay_ms);
        self
    }

    /// Validate this config and fill every unset field with its built-in default
    pub fn resolve(self) -> Result<EndpointConfig, ConfigError> {
        let url = validate_url(&self.url)?;

        let interval_secs = self.interval.unwrap_or(DEFAULT_INTERVAL_SECS);
        validate_interval(interval_secs)?;

        let timeout_ms = self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS);
        validate_timeout(timeout_ms)?;

        let expected_status = self.expected_status.unwrap_or_default();
        validate_status(&expected_status)?;

        let method = match self.method.as_deref() {
            Some(method) => method.parse()?,
            None => HttpMethod::default(),
        };

        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => host_of(&url)?,
        };
        let key = match self.name {
            Some(ref explicit) if !explicit.trim().is_empty() => name.clone(),
            _ => url.clone(),
        };

        Ok(EndpointConfig {
            url,
            name,
            key,
            interval_secs,
            timeout_ms,
            expected_status,
            degraded_threshold_ms: self.degraded_threshold.unwrap_or(DEFAULT_DEGRADED_THRESHOLD_MS),
            method,
            body: self.body,
            content_type: self.content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            headers: self.headers.unwrap_or_default(),
            follow_redirects: self.follow_redirects.unwrap_or(true),
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_delay_ms: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY_MS),
        })
    }
}
