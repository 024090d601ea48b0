use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a monitoring check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Degraded,
    Down,
}

impl std::fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "up"),
            MonitorStatus::Degraded => write!(f, "degraded"),
            MonitorStatus::Down => write!(f, "down"),
        }
    }
}

/// Result of one logical check, however many attempts it took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// URL that was checked
    pub url: String,

    /// Display name of the endpoint
    pub name: String,

    /// Status of the check (up/degraded/down)
    pub status: MonitorStatus,

    /// HTTP status code, when a response was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Response time in milliseconds
    pub response_time: u64,

    /// Error message (if check failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall-clock time the check settled
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            status: MonitorStatus::Down,
            status_code: None,
            response_time: 0,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Mark the check as a completed response with the given classification
    pub fn responded(
        mut self,
        status: MonitorStatus,
        status_code: u16,
        response_time: u64,
    ) -> Self {
        self.status = status;
        self.status_code = Some(status_code);
        self.response_time = response_time;
        self
    }

    /// Mark the check as failed with error
    pub fn failure(mut self, error: impl Into<String>, response_time: u64) -> Self {
        self.status = MonitorStatus::Down;
        self.error = Some(error.into());
        self.response_time = response_time;
        self
    }

    /// Attach the status code of a response that was still treated as a failure
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == MonitorStatus::Up
    }
}
