//! Retry classification and the two backoff policies used by the completion client.
//!
//! Rate limits and transient upstream failures back off on different schedules:
//! - `RateLimitBackoff`: 2s, 4s, 8s, 16s, ...
//! - `TransientErrorBackoff`: 1s, 2s, 4s, 8s, ...

use std::time::Duration;

use crate::llm_client::{CompletionError, TransportError};

/// Exponent cap so the shift below can never overflow.
const MAX_BACKOFF_EXPONENT: u32 = 16;

pub trait BackoffPolicy {
    /// Delay to wait after the failed attempt with 0-based index `attempt`.
    fn delay(&self, attempt: u32) -> Duration;
}

fn exponential(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.min(MAX_BACKOFF_EXPONENT))
}

/// Backoff after HTTP 429: `2^attempt * 2000ms`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitBackoff {
    pub base: Duration,
}

impl Default for RateLimitBackoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(2000),
        }
    }
}

impl BackoffPolicy for RateLimitBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        exponential(self.base, attempt)
    }
}

/// Backoff after 5xx, connection failures and empty completions: `2^attempt * 1000ms`.
#[derive(Debug, Clone, Copy)]
pub struct TransientErrorBackoff {
    pub base: Duration,
}

impl Default for TransientErrorBackoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
        }
    }
}

impl BackoffPolicy for TransientErrorBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        exponential(self.base, attempt)
    }
}

/// What the retry loop should do with a failed attempt.
#[derive(Debug)]
pub enum FailureClass {
    /// Stop immediately and surface this error.
    Fatal(CompletionError),
    RateLimited(String),
    Transient(String),
}

/// Maps a transport failure onto the retry policy.
pub fn classify(error: TransportError) -> FailureClass {
    match error {
        TransportError::Status { status, message } => match status {
            401 | 403 => FailureClass::Fatal(CompletionError::Authentication { status, message }),
            400 => FailureClass::Fatal(CompletionError::BadRequest(message)),
            429 => FailureClass::RateLimited(format!("rate limited (429): {message}")),
            s if s >= 500 => FailureClass::Transient(format!("server error ({s}): {message}")),
            _ => FailureClass::Fatal(CompletionError::Api { status, message }),
        },
        TransportError::Connection(message) => {
            FailureClass::Transient(format!("connection error: {message}"))
        }
        TransportError::Decode(message) => {
            FailureClass::Transient(format!("malformed response: {message}"))
        }
    }
}
