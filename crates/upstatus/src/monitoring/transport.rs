//! Transport failure classification and retry backoff.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Structured kind of a failed attempt.
///
/// Timeout, ConnectionRefused, Connect and Network are transient and eligible
/// for retry. Everything else settles the check immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The attempt hit the configured timeout
    Timeout,
    /// The target actively refused the connection
    ConnectionRefused,
    /// Connection could not be established (includes name resolution failures)
    Connect,
    /// I/O failure after the connection was established
    Network,
    /// Redirect limit exceeded
    Redirect,
    /// The request could not be built or sent as configured
    InvalidRequest,
    Other,
}

impl TransportErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportErrorKind::Timeout
                | TransportErrorKind::ConnectionRefused
                | TransportErrorKind::Connect
                | TransportErrorKind::Network
        )
    }
}

/// Failure of one physical attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("Request timed out after {}ms", timeout.as_millis()),
        )
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = classify_reqwest_error(&err);
        Self::new(kind, error_chain_message(&err))
    }
}

/// Map a reqwest failure onto the transient/non-transient partition
pub fn classify_reqwest_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        return TransportErrorKind::Timeout;
    }

    let io_kind = io_error_kind(err);

    if err.is_connect() {
        return match io_kind {
            Some(io::ErrorKind::ConnectionRefused) => TransportErrorKind::ConnectionRefused,
            Some(io::ErrorKind::TimedOut) => TransportErrorKind::Timeout,
            _ => TransportErrorKind::Connect,
        };
    }

    if err.is_redirect() {
        return TransportErrorKind::Redirect;
    }

    if err.is_builder() {
        return TransportErrorKind::InvalidRequest;
    }

    match io_kind {
        Some(io::ErrorKind::TimedOut) => TransportErrorKind::Timeout,
        Some(io::ErrorKind::ConnectionRefused) => TransportErrorKind::ConnectionRefused,
        Some(_) => TransportErrorKind::Network,
        None if err.is_request() || err.is_body() => TransportErrorKind::Network,
        None => TransportErrorKind::Other,
    }
}

/// First `io::Error` kind found in the source chain
fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = current.source();
    }
    None
}

/// reqwest's top-level message hides the cause, so join the whole chain
fn error_chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

/// Wait before attempt `attempt + 1`, where `attempt` is the 1-indexed
/// attempt that just failed: `base * 2^(attempt - 1)`.
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_ms.saturating_mul(factor))
}
