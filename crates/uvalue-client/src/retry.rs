//! Attempt-bounded retry with exponential backoff

use std::future::Future;
use std::time::Duration;
use uvalue_core::error::{Result, UvalueError};

/// Which failures a policy is allowed to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// Network errors, timeouts and gateway statuses (502/503/504)
    Transient,
    /// Only failures that never produced an HTTP response
    NetworkOnly,
    /// Nothing; one attempt
    Never,
}

/// Retry policy bounded by attempt count rather than elapsed time
///
/// The pause after attempt `i` (0-based) is `base_delay * growth^i`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub growth: f64,
    pub retry_on: RetryOn,
}

impl RetryPolicy {
    /// For idempotent reads: retry transient failures with growing pauses
    pub fn idempotent_read(max_attempts: u32, base_delay: Duration, growth: f64) -> Self {
        Self { max_attempts, base_delay, growth, retry_on: RetryOn::Transient }
    }

    /// For stateless writes: retry only when no response came back, constant pause
    pub fn network_only(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, base_delay: delay, growth: 1.0, retry_on: RetryOn::NetworkOnly }
    }

    /// At-most-once: a single attempt
    pub fn single_attempt() -> Self {
        Self { max_attempts: 1, base_delay: Duration::ZERO, growth: 1.0, retry_on: RetryOn::Never }
    }

    /// Pause to take after the attempt with the given 0-based index fails
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let exponent = i32::try_from(attempt_index).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.growth.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(self.base_delay)
    }

    pub fn should_retry(&self, err: &UvalueError) -> bool {
        match self.retry_on {
            RetryOn::Transient => err.is_transient(),
            RetryOn::NetworkOnly => err.is_network_level(),
            RetryOn::Never => false,
        }
    }

    /// Run `attempt` until it succeeds, fails permanently, or the budget is spent
    ///
    /// The final error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut index = 0;

        loop {
            match attempt(index).await {
                Ok(value) => {
                    if index > 0 {
                        tracing::debug!("{} succeeded on attempt {}", operation, index + 1);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let exhausted = index + 1 >= max_attempts;
                    if exhausted || !self.should_retry(&err) {
                        if exhausted && max_attempts > 1 {
                            tracing::warn!(
                                "{} failed after {} attempts: {}",
                                operation,
                                max_attempts,
                                err
                            );
                        }
                        return Err(err);
                    }

                    let delay = self.delay_for(index);
                    tracing::warn!(
                        "{} attempt {}/{} failed ({}); retrying in {}ms",
                        operation,
                        index + 1,
                        max_attempts,
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    index += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn gateway_error() -> UvalueError {
        UvalueError::HttpStatus { status: 503, body: "warming up".to_string() }
    }

    #[test]
    fn test_delays_grow_geometrically() {
        let policy = RetryPolicy::idempotent_read(6, Duration::from_millis(1500), 1.3);
        assert_eq!(policy.delay_for(0), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(1).as_millis(), 1950);
        assert!(policy.delay_for(2) > policy.delay_for(1));
    }

    #[test]
    fn test_network_only_ignores_statuses() {
        let policy = RetryPolicy::network_only(3, Duration::from_secs(1));
        assert!(!policy.should_retry(&gateway_error()));
        assert!(policy.should_retry(&UvalueError::Network { reason: "reset".to_string() }));
        assert!(policy.should_retry(&UvalueError::Timeout { after: Duration::from_secs(30) }));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_budget_with_increasing_delays() {
        let policy = RetryPolicy::idempotent_read(5, Duration::from_millis(100), 2.0);
        let calls = Arc::new(Mutex::new(Vec::new()));

        let recorder = calls.clone();
        let result: Result<()> = policy
            .run("fetch materials", |_| {
                recorder.lock().unwrap().push(Instant::now());
                async { Err(gateway_error()) }
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, UvalueError::HttpStatus { status: 503, ref body } if body == "warming up"));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        for pair in gaps.windows(2) {
            assert!(pair[1] > pair[0], "delays must strictly increase: {:?}", gaps);
        }
        assert_eq!(gaps[0], Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let policy = RetryPolicy::idempotent_read(6, Duration::from_millis(10), 1.3);
        let count = AtomicU32::new(0);

        let result: Result<()> = policy
            .run("fetch cities", |_| {
                count.fetch_add(1, Ordering::SeqCst);
                async { Err(UvalueError::HttpStatus { status: 400, body: String::new() }) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let policy = RetryPolicy::idempotent_read(6, Duration::from_millis(10), 1.3);

        let value = policy
            .run("fetch materials", |index| async move {
                if index < 2 {
                    Err(UvalueError::Network { reason: "connection refused".to_string() })
                } else {
                    Ok(index)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_retries() {
        let count = AtomicU32::new(0);
        let result: Result<()> = RetryPolicy::single_attempt()
            .run("save design", |_| {
                count.fetch_add(1, Ordering::SeqCst);
                async { Err(UvalueError::Network { reason: "reset".to_string() }) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
