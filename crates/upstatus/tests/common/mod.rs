//! Shared helpers for upstatus integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use upstatus::{
    Checker, EndpointConfig, EndpointMonitor, MonitorConfig, ProbeResponse, TransportError,
    TransportErrorKind,
};

/// What the scripted checker does on one attempt
#[derive(Debug, Clone)]
pub enum Step {
    Respond { status: u16, delay: Duration },
    Fail(TransportErrorKind),
    /// Never completes; only a timeout or cancellation ends the attempt
    Hang,
    /// Like `Hang`, but cancelling the attempt blocks the dropping thread
    HangWithSlowDrop(Duration),
}

impl Step {
    pub fn ok(status: u16) -> Self {
        Step::Respond { status, delay: Duration::ZERO }
    }

    pub fn slow(status: u16, millis: u64) -> Self {
        Step::Respond { status, delay: Duration::from_millis(millis) }
    }
}

/// Checker that plays back a fixed script, then repeats `fallback` forever
pub struct ScriptedChecker {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    attempts: AtomicUsize,
}

impl ScriptedChecker {
    pub fn new(steps: Vec<Step>, fallback: Step) -> Arc<Self> {
        Arc::new(Self { steps: Mutex::new(steps.into()), fallback, attempts: AtomicUsize::new(0) })
    }

    pub fn always(step: Step) -> Arc<Self> {
        Self::new(Vec::new(), step)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Checker for ScriptedChecker {
    async fn probe(&self, _config: &EndpointConfig) -> Result<ProbeResponse, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front().unwrap_or_else(|| self.fallback.clone());

        match step {
            Step::Respond { status, delay } => {
                tokio::time::sleep(delay).await;
                Ok(ProbeResponse::new(status))
            }
            Step::Fail(kind) => {
                Err(TransportError::new(kind, format!("scripted {kind:?} failure")))
            }
            Step::Hang => std::future::pending().await,
            Step::HangWithSlowDrop(hold) => {
                let _guard = BlockOnDrop(hold);
                std::future::pending().await
            }
        }
    }
}

struct BlockOnDrop(Duration);

impl Drop for BlockOnDrop {
    fn drop(&mut self) {
        std::thread::sleep(self.0);
    }
}

/// Monitor for a placeholder URL driven by `checker`
pub fn scripted_monitor(config: MonitorConfig, checker: Arc<ScriptedChecker>) -> EndpointMonitor {
    let config = config.resolve().expect("valid test config");
    EndpointMonitor::with_checker(config, checker)
}

/// Let spawned monitor tasks run up to their next suspension point
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
