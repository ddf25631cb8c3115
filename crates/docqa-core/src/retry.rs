//! Generic retry-with-backoff wrapper for calls to external services

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::Result;

/// Retry policy with capped exponential backoff
///
/// `max_attempts` counts the initial call, so `max_attempts = 4` allows three
/// retries after the first failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the given retry attempt (1-based), doubling each time
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base_ms = self.base_delay.as_millis().max(1) as u64;
        Duration::from_millis(base_ms.saturating_mul(1 << exponent))
    }
}

/// Run an async operation, retrying transient failures per the policy
///
/// Only errors classified transient by `Error::is_transient` are retried;
/// everything else surfaces immediately. The last error is returned once the
/// attempt budget is exhausted.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_succeeds_after_three_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&quick_policy(4), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= 3 {
                    Err(Error::Network(format!("attempt {} failed", n)))
                } else {
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_exhausts_attempt_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(&quick_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Timeout("embedding request".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(&quick_policy(4), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::InvalidQuery("k must be positive".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(Error::InvalidQuery(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
    }
}
