//! Configuration data structures for monitored endpoints.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// HTTP method used for a check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Whether a configured request body is sent with this method
    pub fn allows_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            other => Err(ConfigError::InvalidMethod(other.to_string())),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// Status code(s) that count as a healthy response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedStatus {
    One(u16),
    Any(Vec<u16>),
}

impl ExpectedStatus {
    pub fn contains(&self, status_code: u16) -> bool {
        match self {
            ExpectedStatus::One(code) => *code == status_code,
            ExpectedStatus::Any(codes) => codes.contains(&status_code),
        }
    }

    pub fn codes(&self) -> &[u16] {
        match self {
            ExpectedStatus::One(code) => std::slice::from_ref(code),
            ExpectedStatus::Any(codes) => codes,
        }
    }
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        ExpectedStatus::One(super::DEFAULT_EXPECTED_STATUS)
    }
}

impl From<u16> for ExpectedStatus {
    fn from(code: u16) -> Self {
        ExpectedStatus::One(code)
    }
}

impl From<Vec<u16>> for ExpectedStatus {
    fn from(codes: Vec<u16>) -> Self {
        match codes.as_slice() {
            [code] => ExpectedStatus::One(*code),
            _ => ExpectedStatus::Any(codes),
        }
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self.codes().iter().map(u16::to_string).collect();
        f.write_str(&codes.join(", "))
    }
}

/// Raw monitor configuration as supplied by a caller or config file.
///
/// Every field except `url` is optional; missing values are filled from
/// [`ConfigDefaults`](super::ConfigDefaults) and then the built-in defaults
/// when the config is resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Poll interval in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Per-request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<ExpectedStatus>,

    /// Response time above which a healthy status is reported as degraded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_threshold: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_redirects: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Base retry delay in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u64>,
}

/// Validated, fully-defaulted configuration of one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    /// Normalized URL (always http:// or https://)
    pub url: String,
    /// Display name, the URL host unless set explicitly
    pub name: String,
    /// Registry key: the explicit name if one was given, else the URL
    pub key: String,
    pub interval_secs: u64,
    pub timeout_ms: u64,
    pub expected_status: ExpectedStatus,
    pub degraded_threshold_ms: u64,
    pub method: HttpMethod,
    pub body: Option<String>,
    pub content_type: String,
    pub headers: BTreeMap<String, String>,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl EndpointConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Total number of transport attempts a single check may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Body to send, if any. Bodies are dropped for methods that do not carry one.
    pub fn request_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|_| self.method.allows_body())
    }
}
