//! Bounded retry helper for transient store/adapter faults, generalized from
//! the original implementation's `execute_with_retry` wrapper to any
//! `Future`-returning closure.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Retries `op` up to `policy.max_attempts` times with exponential backoff,
/// returning the last error if every attempt fails. `is_retryable` lets the
/// caller distinguish transient faults from ones retrying can't fix.
pub async fn with_retry<F, Fut, T, E>(
    policy: RetryPolicy,
    is_retryable: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && is_retryable(&err) => {
                let delay = policy.base_delay * 2u32.pow(attempt - 1);
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy { max_attempts: 5, base_delay: Duration::from_millis(1) };

        let result: Result<&str, &str> = with_retry(policy, |_| true, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_returns_immediately() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<&str, &str> = with_retry(policy, |_| false, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move { Err("permanent") }
        })
        .await;

        assert_eq!(result, Err("permanent"));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
