//! Bounded retry with quadratic backoff

use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;

/// How many times to try and how long to wait in between
///
/// Attempt `i` (zero-based) is preceded by `i² × backoff_base`, so with the
/// defaults the waits are 0s, 1s, 4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

/// The last failure once every attempt has been used
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    /// Creates a policy, clamping `max_attempts` to at least one
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
        )
    }

    /// Delay to wait before the zero-based `attempt`
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff_base
            .checked_mul(attempt.saturating_mul(attempt))
            .unwrap_or(Duration::MAX)
    }

    /// Runs `operation` until it succeeds or the attempts run out
    ///
    /// The closure receives the zero-based attempt number.
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The first successful result
    /// * `Err(RetryExhausted)` - Every attempt failed; carries the last error
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                tracing::debug!("Waiting {:?} before attempt {}", delay, attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }
                    tracing::warn!(
                        "Attempt {}/{} failed: {}",
                        attempt,
                        self.max_attempts,
                        e
                    );
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
