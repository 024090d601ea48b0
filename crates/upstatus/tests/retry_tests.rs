//! Retry, backoff and timeout behavior of a single check

mod common;

use std::time::Duration;

use common::{ScriptedChecker, Step, scripted_monitor};
use tokio::time::Instant;
use upstatus::{MonitorConfig, MonitorStatus, TransportErrorKind};

fn config() -> MonitorConfig {
    MonitorConfig::new("https://example.com")
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_then_success_is_up() {
    let checker = ScriptedChecker::new(
        vec![Step::Fail(TransportErrorKind::Network), Step::slow(200, 10)],
        Step::ok(200),
    );
    let monitor = scripted_monitor(config().with_retries(1, 100), checker.clone());

    let started = Instant::now();
    let result = monitor.check().await;
    let elapsed = started.elapsed();

    assert_eq!(result.status, MonitorStatus::Up);
    assert_eq!(result.status_code, Some(200));
    assert_eq!(checker.attempts(), 2);
    // One 100ms backoff plus the 10ms response
    assert!(elapsed >= Duration::from_millis(110), "elapsed {elapsed:?}");
    assert!(result.response_time >= 10 && result.response_time < 100);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_make_exactly_max_plus_one_attempts() {
    let checker = ScriptedChecker::always(Step::Fail(TransportErrorKind::ConnectionRefused));
    let monitor = scripted_monitor(config().with_retries(2, 100), checker.clone());

    let result = monitor.check().await;

    assert_eq!(checker.attempts(), 3);
    assert_eq!(result.status, MonitorStatus::Down);
    assert!(result.error.as_deref().is_some_and(|e| e.contains("ConnectionRefused")));
    // Measured from the first attempt: 100ms + 200ms of backoff
    assert!(result.response_time >= 300, "response time {}", result.response_time);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_grows_exponentially() {
    let checker = ScriptedChecker::always(Step::Fail(TransportErrorKind::Timeout));
    let monitor = scripted_monitor(config().with_retries(3, 50), checker.clone());

    let started = Instant::now();
    monitor.check().await;

    assert_eq!(checker.attempts(), 4);
    // 50 + 100 + 200
    assert!(started.elapsed() >= Duration::from_millis(350));
    assert!(started.elapsed() < Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_non_transient_failure_is_not_retried() {
    let checker = ScriptedChecker::always(Step::Fail(TransportErrorKind::InvalidRequest));
    let monitor = scripted_monitor(config().with_retries(3, 100), checker.clone());

    let result = monitor.check().await;

    assert_eq!(checker.attempts(), 1);
    assert_eq!(result.status, MonitorStatus::Down);
    assert!(result.error.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_status_is_not_retried() {
    let checker = ScriptedChecker::always(Step::ok(503));
    let monitor = scripted_monitor(config().with_retries(3, 100), checker.clone());

    let result = monitor.check().await;

    assert_eq!(checker.attempts(), 1);
    assert_eq!(result.status, MonitorStatus::Down);
    assert_eq!(result.status_code, Some(503));
    assert!(result.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_slow_valid_response_is_not_retried() {
    let checker = ScriptedChecker::always(Step::slow(200, 3_000));
    let monitor = scripted_monitor(config().with_retries(3, 100), checker.clone());

    let result = monitor.check().await;

    assert_eq!(checker.attempts(), 1);
    assert_eq!(result.status, MonitorStatus::Degraded);
}

#[tokio::test(start_paused = true)]
async fn test_hung_attempt_is_aborted_at_timeout_and_retried() {
    let checker = ScriptedChecker::new(vec![Step::Hang], Step::ok(200));
    let monitor =
        scripted_monitor(config().with_timeout(250).with_retries(1, 100), checker.clone());

    let started = Instant::now();
    let result = monitor.check().await;

    assert_eq!(checker.attempts(), 2);
    assert_eq!(result.status, MonitorStatus::Up);
    assert!(started.elapsed() >= Duration::from_millis(350));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_without_retries_is_down() {
    let checker = ScriptedChecker::always(Step::Hang);
    let monitor = scripted_monitor(config().with_timeout(250), checker.clone());

    let result = monitor.check().await;

    assert_eq!(checker.attempts(), 1);
    assert_eq!(result.status, MonitorStatus::Down);
    assert_eq!(result.error.as_deref(), Some("Request timed out after 250ms"));
    assert!((250..260).contains(&result.response_time));
}

#[tokio::test(start_paused = true)]
async fn test_one_result_recorded_per_check_despite_retries() {
    let checker = ScriptedChecker::new(
        vec![Step::Fail(TransportErrorKind::Connect), Step::Fail(TransportErrorKind::Connect)],
        Step::ok(200),
    );
    let monitor = scripted_monitor(config().with_retries(2, 10), checker.clone());

    monitor.check().await;
    let stats = monitor.stats();

    assert_eq!(checker.attempts(), 3);
    assert_eq!(stats.checks, 1);
    assert_eq!(stats.history.len(), 1);
    assert_eq!(stats.last_status(), Some(MonitorStatus::Up));
}

#[tokio::test(start_paused = true)]
async fn test_manual_checks_are_serialized() {
    let checker = ScriptedChecker::always(Step::slow(200, 100));
    let monitor = scripted_monitor(config(), checker.clone());

    let started = Instant::now();
    let (a, b) = tokio::join!(monitor.check(), monitor.check());

    assert_eq!(a.status, MonitorStatus::Up);
    assert_eq!(b.status, MonitorStatus::Up);
    // The second check waits for the first
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(monitor.stats().checks, 2);
}
