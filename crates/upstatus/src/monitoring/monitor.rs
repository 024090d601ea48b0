//! Single-endpoint monitor: classified checks with retry, a rolling stats
//! window, and a cancellable periodic schedule.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep, timeout};
use tracing::{debug, error, info, warn};

use super::checker::{Checker, HttpChecker, ProbeResponse};
use super::stats::MonitorStats;
use super::transport::{TransportError, backoff_delay};
use super::types::{CheckResult, MonitorStatus};
use crate::config::{EndpointConfig, MonitorConfig};

/// Classify a completed response.
///
/// A status outside the expected set is always `Down`; latency only matters
/// once the status is acceptable.
pub fn classify(config: &EndpointConfig, status_code: u16, response_time_ms: u64) -> MonitorStatus {
    if !config.expected_status.contains(status_code) {
        MonitorStatus::Down
    } else if response_time_ms > config.degraded_threshold_ms {
        MonitorStatus::Degraded
    } else {
        MonitorStatus::Up
    }
}

/// Handle to one monitored endpoint. Clones share the same state.
#[derive(Clone)]
pub struct EndpointMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    config: EndpointConfig,
    checker: Arc<dyn Checker>,
    stats: RwLock<MonitorStats>,
    /// Serializes checks so stats updates never interleave
    check_gate: Mutex<()>,
    /// Bumped by `stop()`; checks subscribed before the bump are abandoned
    stop_signal: watch::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EndpointMonitor {
    /// Validate `config` and build a monitor that checks over HTTP
    pub fn new(config: MonitorConfig) -> crate::Result<Self> {
        let config = config.resolve()?;
        Self::from_endpoint(config)
    }

    pub fn from_endpoint(config: EndpointConfig) -> crate::Result<Self> {
        let checker = HttpChecker::new(&config)?;
        Ok(Self::with_checker(config, Arc::new(checker)))
    }

    /// Build a monitor around a custom [`Checker`]
    pub fn with_checker(config: EndpointConfig, checker: Arc<dyn Checker>) -> Self {
        let stats = MonitorStats::new(&config.url, &config.name);
        Self {
            inner: Arc::new(Inner {
                config,
                checker,
                stats: RwLock::new(stats),
                check_gate: Mutex::new(()),
                stop_signal: watch::channel(()).0,
                task: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.inner.config
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Registry key: explicit name if one was configured, else the URL
    pub fn key(&self) -> &str {
        &self.inner.config.key
    }

    /// Copy of the current statistics
    pub fn stats(&self) -> MonitorStats {
        self.inner.stats.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.task.lock().await.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Run one classified check (retrying transport failures per the retry
    /// policy), fold it into the stats and return it. Never fails: every
    /// failure mode becomes a `Down` result.
    ///
    /// A [`stop`](Self::stop) issued while this check is in flight abandons
    /// the request; the returned `Down` result is then left out of the stats.
    pub async fn check(&self) -> CheckResult {
        let started = Instant::now();
        let mut stopped = self.inner.stop_signal.subscribe();

        tokio::select! {
            biased;
            _ = stopped.changed() => {
                debug!(name = %self.name(), "Check cancelled by stop");
                CheckResult::new(&self.inner.config.url, &self.inner.config.name)
                    .failure("Check cancelled: monitor stopped", elapsed_ms(started))
            }
            result = self.inner.check_and_record() => result,
        }
    }

    /// Check immediately, then every interval until [`stop`](Self::stop).
    /// Calling this on a running monitor does nothing.
    pub async fn start(&self) {
        let mut task = self.inner.task.lock().await;
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let config = &self.inner.config;
        info!(
            name = %config.name,
            url = %config.url,
            interval_secs = config.interval_secs,
            "Starting monitor for {}",
            config.name
        );

        let monitor = self.clone();
        *task = Some(tokio::spawn(async move { monitor.run().await }));
    }

    /// Cancel the schedule along with any in-flight request or backoff wait,
    /// including checks started through [`check`](Self::check). Once this
    /// returns no check that was in flight records into the stats.
    pub async fn stop(&self) {
        let mut task = self.inner.task.lock().await;
        self.inner.stop_signal.send_replace(());

        let handle = task.take();
        let was_running = handle.is_some();
        if let Some(handle) = handle {
            handle.abort();
            match handle.await {
                Err(e) if e.is_panic() => {
                    error!(name = %self.name(), "Monitor task panicked: {}", e);
                }
                _ => {}
            }
        }

        // Cancelled manual checks release the gate as they unwind
        drop(self.inner.check_gate.lock().await);

        if was_running {
            info!(name = %self.name(), "Stopped monitor for {}", self.name());
        }
    }

    async fn run(self) {
        let mut timer = interval(self.inner.config.interval());
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick completes immediately
            timer.tick().await;
            self.inner.check_and_record().await;
        }
    }
}

impl std::fmt::Debug for EndpointMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointMonitor")
            .field("key", &self.inner.config.key)
            .field("url", &self.inner.config.url)
            .finish_non_exhaustive()
    }
}

impl Inner {
    async fn check_and_record(&self) -> CheckResult {
        let _gate = self.check_gate.lock().await;

        let result = self.run_check().await;
        self.log_result(&result);

        self.stats.write().unwrap_or_else(PoisonError::into_inner).record(result.clone());
        result
    }

    async fn run_check(&self) -> CheckResult {
        let config = &self.config;
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let attempt_started = Instant::now();
            debug!(
                name = %config.name,
                attempt,
                method = %config.method,
                "Checking {}",
                config.url
            );

            let outcome = match timeout(config.timeout(), self.checker.probe(config)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(TransportError::timeout(config.timeout())),
            };

            match outcome {
                Ok(response) => {
                    return self.settle_response(response, elapsed_ms(attempt_started));
                }
                Err(err) if err.is_transient() && attempt < config.max_attempts() => {
                    let delay = backoff_delay(config.retry_delay_ms, attempt);
                    warn!(
                        name = %config.name,
                        attempt,
                        max_attempts = config.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        "Check attempt failed, retrying: {}",
                        err
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    return CheckResult::new(&config.url, &config.name)
                        .failure(err.message, elapsed_ms(started));
                }
            }
        }
    }

    fn settle_response(&self, response: ProbeResponse, response_time: u64) -> CheckResult {
        let config = &self.config;
        let result = CheckResult::new(&config.url, &config.name);

        if !config.follow_redirects && response.is_redirect() {
            let target = response.location.as_deref().unwrap_or("unknown location");
            return result
                .failure(
                    format!(
                        "Redirect ({}) to {} not followed: redirects are disabled",
                        response.status_code, target
                    ),
                    response_time,
                )
                .with_status_code(response.status_code);
        }

        let status = classify(config, response.status_code, response_time);
        result.responded(status, response.status_code, response_time)
    }

    fn log_result(&self, result: &CheckResult) {
        let config = &self.config;
        match (result.status, result.status_code) {
            (MonitorStatus::Up, status_code) => info!(
                name = %config.name,
                status_code,
                response_time_ms = result.response_time,
                "{} is UP",
                config.name
            ),
            (MonitorStatus::Degraded, status_code) => warn!(
                name = %config.name,
                status_code,
                response_time_ms = result.response_time,
                threshold_ms = config.degraded_threshold_ms,
                "{} is SLOW",
                config.name
            ),
            (MonitorStatus::Down, _) => match &result.error {
                Some(error) => {
                    error!(name = %config.name, error = %error, "{} is DOWN", config.name)
                }
                None => error!(
                    name = %config.name,
                    status_code = result.status_code,
                    expected = %config.expected_status,
                    "{} is DOWN",
                    config.name
                ),
            },
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
