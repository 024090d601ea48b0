//! Rolling per-endpoint statistics.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::types::{CheckResult, MonitorStatus};
use crate::HISTORY_CAPACITY;

/// Reliability statistics of one endpoint over its rolling window.
///
/// `uptime` and `avg_response_time` are recomputed from `history` on every
/// [`record`](Self::record); they are never adjusted on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStats {
    pub url: String,
    pub name: String,

    /// Checks performed since the monitor was created
    pub checks: u64,

    /// Percentage of `up` results in the window, one decimal place
    pub uptime: f64,

    /// Mean response time over the window in milliseconds
    pub avg_response_time: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<CheckResult>,

    pub history: VecDeque<CheckResult>,
}

impl MonitorStats {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            checks: 0,
            uptime: 100.0,
            avg_response_time: 0,
            last_check: None,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Fold a settled check into the window
    pub fn record(&mut self, result: CheckResult) {
        self.checks += 1;
        self.last_check = Some(result.clone());

        self.history.push_back(result);
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }

        self.uptime = uptime_of(&self.history);
        self.avg_response_time = avg_response_time_of(&self.history);
    }

    pub fn last_status(&self) -> Option<MonitorStatus> {
        self.last_check.as_ref().map(|check| check.status)
    }
}

/// round(up / len * 1000) / 10, or 100.0 for an empty window
pub fn uptime_of(history: &VecDeque<CheckResult>) -> f64 {
    if history.is_empty() {
        return 100.0;
    }

    let up = history.iter().filter(|r| r.status == MonitorStatus::Up).count();
    (up as f64 / history.len() as f64 * 1000.0).round() / 10.0
}

/// Mean response time rounded to the nearest millisecond, 0 for an empty window
pub fn avg_response_time_of(history: &VecDeque<CheckResult>) -> u64 {
    if history.is_empty() {
        return 0;
    }

    let total: u64 = history.iter().map(|r| r.response_time).sum();
    (total as f64 / history.len() as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: MonitorStatus, response_time: u64) -> CheckResult {
        CheckResult::new("https://example.com", "example.com").responded(status, 200, response_time)
    }

    #[test]
    fn test_new_stats_are_empty() {
        let stats = MonitorStats::new("https://example.com", "example.com");
        assert_eq!(stats.checks, 0);
        assert_eq!(stats.uptime, 100.0);
        assert_eq!(stats.avg_response_time, 0);
        assert!(stats.last_check.is_none());
        assert!(stats.history.is_empty());
    }

    #[test]
    fn test_uptime_rounds_to_one_decimal() {
        let mut stats = MonitorStats::new("https://example.com", "example.com");
        stats.record(result(MonitorStatus::Up, 100));
        stats.record(result(MonitorStatus::Up, 100));
        stats.record(result(MonitorStatus::Degraded, 100));

        // 2/3 -> 66.7
        assert_eq!(stats.uptime, 66.7);
        assert_eq!(stats.last_status(), Some(MonitorStatus::Degraded));
    }

    #[test]
    fn test_avg_response_time_rounds_to_nearest() {
        let mut stats = MonitorStats::new("https://example.com", "example.com");
        stats.record(result(MonitorStatus::Up, 10));
        stats.record(result(MonitorStatus::Up, 11));

        // 10.5 rounds up
        assert_eq!(stats.avg_response_time, 11);
    }

    #[test]
    fn test_history_is_bounded_and_evicts_oldest() {
        let mut stats = MonitorStats::new("https://example.com", "example.com");
        for i in 0..=HISTORY_CAPACITY as u64 {
            stats.record(result(MonitorStatus::Up, i));
        }

        assert_eq!(stats.history.len(), HISTORY_CAPACITY);
        assert_eq!(stats.checks, HISTORY_CAPACITY as u64 + 1);
        // The first result (response_time 0) was evicted
        assert_eq!(stats.history.front().map(|r| r.response_time), Some(1));
        assert_eq!(stats.history.back().map(|r| r.response_time), Some(HISTORY_CAPACITY as u64));
    }

    #[test]
    fn test_derived_fields_follow_window_not_lifetime() {
        let mut stats = MonitorStats::new("https://example.com", "example.com");
        for _ in 0..HISTORY_CAPACITY {
            stats.record(result(MonitorStatus::Down, 1000));
        }
        assert_eq!(stats.uptime, 0.0);

        for _ in 0..HISTORY_CAPACITY {
            stats.record(result(MonitorStatus::Up, 20));
        }

        assert_eq!(stats.uptime, 100.0);
        assert_eq!(stats.avg_response_time, 20);
        assert_eq!(stats.uptime, uptime_of(&stats.history));
        assert_eq!(stats.avg_response_time, avg_response_time_of(&stats.history));
    }
}
