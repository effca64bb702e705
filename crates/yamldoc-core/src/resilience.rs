//! Resilience patterns: bounded retry with fixed backoff

use serde::{Deserialize, Serialize};
use std::thread::sleep;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds
    pub backoff_ms: u64,
}

impl RetryConfig {
    /// Defaults for document writes: 3 attempts, 500ms apart
    pub const fn conservative() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 500,
        }
    }

    /// Same attempt count without sleeping, for tests and tooling
    pub const fn immediate() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 0,
        }
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::conservative()
    }
}

/// Fixed backoff retry executor.
///
/// Calls `f` with the 1-based attempt number until it succeeds or
/// `max_attempts` is reached. The error of the final attempt is returned
/// untouched. A `max_attempts` of zero still runs one attempt.
pub fn retry_with_backoff<F, T, E>(config: &RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f(attempt) {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= max_attempts {
                    return Err(e);
                }
                if config.backoff_ms > 0 {
                    sleep(config.backoff());
                }
            }
        }
    }
}
