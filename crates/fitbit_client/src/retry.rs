use rand::{RngExt, rng};
use std::time::Duration;

/// Retry policy for idempotent upstream reads: exponential backoff with
/// jitter, retrying only errors the caller classifies as transient.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub async fn retry_async<F, Fut, T, E, P>(&self, should_retry: P, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    // exponential backoff with jitter
                    let max_delay = self.base_delay * (1u32 << attempt);
                    let jitter = {
                        let mut rng = rng();
                        rng.random_range(0..max_delay.as_millis() as u64)
                    };
                    let delay = Duration::from_millis(jitter.min(max_delay.as_millis() as u64));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
        };
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result = policy
            .retry_async(
                |_e: &&str| true,
                move || {
                    let c = c.clone();
                    async move {
                        let prev = c.fetch_add(1, Ordering::SeqCst) + 1;
                        if prev < 3 { Err("fail") } else { Ok(42) }
                    }
                },
            )
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
        };
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<u32, &str> = policy
            .retry_async(
                |_e: &&str| false,
                move || {
                    let c = c.clone();
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                        Err("denied")
                    }
                },
            )
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
