//! Timeout and retry policy for external calls, and the pricing lookup
//! wrapper built on it.
//!
//! Every attempt runs under a deadline. Transient failures are retried with
//! exponential backoff until either the attempt cap or the elapsed-time
//! budget runs out. Anything else is returned immediately.

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoffBuilder};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::domain::DataOrigin;
use crate::services::pricing::{
    LaborQuote, LaborRateLookup, LaborRequest, MaterialPriceLookup, MaterialQuote,
    MaterialRequest, PricingError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Deadline for one attempt
    pub attempt_timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Total time spent across attempts and waits
    pub max_elapsed: Duration,
    pub initial_interval: Duration,
}

/// Error classification a retry loop needs
pub trait RetryableError: std::fmt::Display {
    /// Whether another attempt could succeed
    fn is_transient(&self) -> bool;

    /// Error reported when one attempt misses its deadline
    fn timed_out(after: Duration) -> Self;
}

impl RetryableError for PricingError {
    fn is_transient(&self) -> bool {
        PricingError::is_transient(self)
    }

    fn timed_out(after: Duration) -> Self {
        Self::Timeout(after)
    }
}

impl RetryPolicy {
    /// Run `op` with a deadline per attempt, retrying transient failures
    pub async fn run<T, E, F, Fut>(&self, call: &str, op: F) -> Result<T, E>
    where
        E: RetryableError,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let policy = *self;
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(policy.initial_interval)
            .with_max_elapsed_time(Some(policy.max_elapsed))
            .build();
        let attempts = AtomicU32::new(0);

        retry(backoff, || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            let fut = op();
            async move {
                let result = match tokio::time::timeout(policy.attempt_timeout, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(E::timed_out(policy.attempt_timeout)),
                };
                match result {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_transient() && attempt <= policy.max_retries => {
                        warn!(call, attempt, error = %e, "Call failed, retrying");
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(2_000),
            max_retries: 2,
            max_elapsed: Duration::from_millis(5_000),
            initial_interval: Duration::from_millis(100),
        }
    }
}

/// Decorates any pricing lookup with the configured retry policy
#[derive(Debug, Clone)]
pub struct ResilientPricing<L> {
    inner: L,
    policy: RetryPolicy,
}

impl<L> ResilientPricing<L> {
    pub fn new(inner: L, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<L: MaterialPriceLookup> MaterialPriceLookup for ResilientPricing<L> {
    async fn lookup_material(&self, request: &MaterialRequest) -> Result<MaterialQuote, PricingError> {
        self.policy.run("material", || self.inner.lookup_material(request)).await
    }

    fn origin(&self) -> DataOrigin {
        MaterialPriceLookup::origin(&self.inner)
    }
}

#[async_trait]
impl<L: LaborRateLookup> LaborRateLookup for ResilientPricing<L> {
    async fn lookup_labor(&self, request: &LaborRequest) -> Result<LaborQuote, PricingError> {
        self.policy.run("labor", || self.inner.lookup_labor(request)).await
    }

    fn origin(&self) -> DataOrigin {
        LaborRateLookup::origin(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricingProcess;
    use crate::services::pricing::LaborUnit;

    /// Fails with the given error for the first `failures` calls
    struct Flaky {
        calls: AtomicU32,
        failures: u32,
        error: PricingError,
    }

    #[async_trait]
    impl LaborRateLookup for Flaky {
        async fn lookup_labor(&self, request: &LaborRequest) -> Result<LaborQuote, PricingError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(self.error.clone());
            }
            Ok(LaborQuote {
                daily_output: request.daily_output,
                crew_size: request.crew_size,
                rate_per_person_day: 250_000.0,
            })
        }
    }

    /// Never answers
    struct Hanging;

    #[async_trait]
    impl LaborRateLookup for Hanging {
        async fn lookup_labor(&self, _request: &LaborRequest) -> Result<LaborQuote, PricingError> {
            std::future::pending().await
        }
    }

    fn request() -> LaborRequest {
        LaborRequest {
            process: PricingProcess::Finish,
            unit: LaborUnit::M2,
            total_quantity: 100.0,
            daily_output: 40.0,
            crew_size: 2,
            difficulty_factor: 1.0,
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            attempt_timeout: Duration::from_millis(50),
            max_retries,
            max_elapsed: Duration::from_secs(2),
            initial_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let lookup = ResilientPricing::new(
            Flaky {
                calls: AtomicU32::new(0),
                failures: 2,
                error: PricingError::Unavailable("connection reset".into()),
            },
            fast_policy(2),
        );

        let quote = lookup.lookup_labor(&request()).await.unwrap();
        assert_eq!(quote.rate_per_person_day, 250_000.0);
        assert_eq!(lookup.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_stop_at_the_attempt_cap() {
        let lookup = ResilientPricing::new(
            Flaky {
                calls: AtomicU32::new(0),
                failures: 10,
                error: PricingError::Unavailable("down".into()),
            },
            fast_policy(1),
        );

        let err = lookup.lookup_labor(&request()).await.unwrap_err();
        assert!(matches!(err, PricingError::Unavailable(_)));
        assert_eq!(lookup.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let lookup = ResilientPricing::new(
            Flaky {
                calls: AtomicU32::new(0),
                failures: 10,
                error: PricingError::NotFound("labor cost for finish".into()),
            },
            fast_policy(3),
        );

        let err = lookup.lookup_labor(&request()).await.unwrap_err();
        assert!(matches!(err, PricingError::NotFound(_)));
        assert_eq!(lookup.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hanging_lookup_times_out() {
        let lookup = ResilientPricing::new(Hanging, fast_policy(0));
        let err = lookup.lookup_labor(&request()).await.unwrap_err();
        assert_eq!(err, PricingError::Timeout(Duration::from_millis(50)));
    }
}
