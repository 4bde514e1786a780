use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LedgerError;
use crate::event::{EventFilter, LedgerEvent};
use crate::traits::LedgerReader;

/// Bounded retry schedule for ledger reads.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the second attempt; doubles per attempt thereafter.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    fn delay_before(&self, attempt: u32) -> Duration {
        // attempt is 1-based; the delay doubles after each failure.
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Wraps any [`LedgerReader`] with bounded backoff on transient failures.
///
/// Deterministic rejections pass straight through; only transport-level
/// faults are retried. When the schedule is exhausted the reader reports
/// [`LedgerError::Unavailable`], the signal downstream reconstruction maps
/// to "reconstruction unavailable".
pub struct RetryingReader<R> {
    inner: R,
    policy: RetryPolicy,
}

impl<R> RetryingReader<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: LedgerReader> LedgerReader for RetryingReader<R> {
    async fn scan(&self, filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError> {
        let attempts = self.policy.attempts.max(1);

        for attempt in 1..=attempts {
            match self.inner.scan(filter).await {
                Ok(events) => return Ok(events),
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.policy.delay_before(attempt);
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "ledger scan failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(LedgerError::Unavailable { attempts });
                }
                Err(e) => return Err(e),
            }
        }

        Err(LedgerError::Unavailable { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Reader that fails a configured number of times before succeeding.
    struct FlakyReader {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyReader {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LedgerReader for FlakyReader {
        async fn scan(&self, _filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(LedgerError::Unreachable {
                    reason: "connection refused".into(),
                })
            } else {
                Ok(vec![])
            }
        }
    }

    /// Reader that always fails deterministically.
    struct RejectingReader;

    #[async_trait]
    impl LedgerReader for RejectingReader {
        async fn scan(&self, _filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError> {
            Err(LedgerError::Reverted {
                reason: "bad filter".into(),
            })
        }
    }

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn recovers_within_budget() {
        let reader = RetryingReader::new(FlakyReader::new(2), fast_policy(3));
        let events = reader.scan(&EventFilter::all()).await.unwrap();
        assert!(events.is_empty());
        assert_eq!(reader.into_inner().call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_budget_reports_unavailable() {
        let reader = RetryingReader::new(FlakyReader::new(10), fast_policy(3));
        let err = reader.scan(&EventFilter::all()).await.unwrap_err();
        assert_eq!(err, LedgerError::Unavailable { attempts: 3 });
        assert_eq!(reader.into_inner().call_count(), 3);
    }

    #[tokio::test]
    async fn deterministic_errors_are_not_retried() {
        let reader = RetryingReader::new(RejectingReader, fast_policy(5));
        let err = reader.scan(&EventFilter::all()).await.unwrap_err();
        assert!(matches!(err, LedgerError::Reverted { .. }));
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_before(1), Duration::from_millis(100));
        assert_eq!(policy.delay_before(2), Duration::from_millis(200));
        assert_eq!(policy.delay_before(3), Duration::from_millis(400));
    }
}
