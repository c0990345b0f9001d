//! Bounded retry for transient database failures.
//!
//! Connectivity loss is retryable; SQL-level failures are not. The policy is
//! decoupled from the store so the query code stays a plain sqlx call.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::StoreError;
use crate::metrics;

/// Exponential backoff policy for transient store failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts before surfacing `Unavailable`.
    pub max_attempts: u32,
    /// Initial backoff delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum backoff delay in seconds.
    pub max_delay_s: u64,
    /// Backoff multiplier (e.g., 2.0 for exponential).
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 1000,
            max_delay_s: 30,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create from config values.
    pub fn from_config(max_attempts: u32, max_delay_s: u64) -> Self {
        Self {
            max_attempts,
            max_delay_s,
            ..Default::default()
        }
    }

    /// Calculate next delay with exponential backoff.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let max_delay_ms = self.max_delay_s * 1000;
        let clamped_ms = delay_ms.min(max_delay_ms as f64) as u64;
        Duration::from_millis(clamped_ms)
    }

    /// Run `op`, retrying transient failures until the budget is spent.
    ///
    /// Non-transient errors pass through as [`StoreError::Backend`] on the
    /// first occurrence.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let mut attempt = 0u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) => {
                    if attempt + 1 >= self.max_attempts {
                        return Err(StoreError::Unavailable {
                            attempts: attempt + 1,
                            reason: err.to_string(),
                        });
                    }

                    let delay = self.next_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient store failure, retrying"
                    );
                    metrics::inc_store_retries();

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(StoreError::Backend(err)),
            }
        }
    }
}

/// Classify a sqlx error as transient connectivity loss.
fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
