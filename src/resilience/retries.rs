//! Retry logic.
//!
//! # Responsibilities
//! - Determine if an upstream outcome is retryable
//! - Compute exponential backoff with jitter between attempts
//!
//! # Design Decisions
//! - Only GET/HEAD reach the object store, so every call is idempotent
//! - Connection errors and timeouts are always retryable
//! - 502/503/504 are retryable; other statuses (404 included) are final

use std::time::Duration;

use axum::http::StatusCode;
use rand::Rng;

use crate::config::RetryConfig;

/// How many times to try an upstream call and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn fail_fast() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        if !config.enabled {
            return Self::fail_fast();
        }
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before the attempt following `attempt`.
    ///
    /// Doubles from `base_delay`, capped at `max_delay`, plus up to 10% jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_ms = self.base_delay.as_millis() as u64;
        let max_ms = self.max_delay.as_millis() as u64;
        let capped = base_ms
            .saturating_mul(2u64.saturating_pow(attempt - 1))
            .min(max_ms);

        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}

/// Decide whether an upstream outcome deserves another attempt.
///
/// `status` is `None` when no response arrived (connect error, timeout).
pub fn is_retryable(status: Option<StatusCode>) -> bool {
    match status {
        None => true,
        Some(status) => matches!(
            status,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        ),
    }
}
