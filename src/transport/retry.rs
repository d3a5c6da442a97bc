// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Retry with exponential backoff for fallible async operations.
//!
//! The [`RetryExecutor`] wraps any `FnMut() -> Future<Output = Result<T, E>>`
//! and retries transient failures. The backoff formula is:
//!
//! ```text
//! delay = min(base_delay * backoff_factor^attempt, max_delay)
//! ```
//!
//! Failures that can never succeed on retry (invalid requests, not-found
//! answers, 4xx statuses other than 429) short-circuit immediately as
//! [`RetryFailure::NonRetryable`].
//!
//! # Example
//!
//! ```rust,ignore
//! use crossscan::transport::{RetryExecutor, RetryPolicy};
//!
//! let executor = RetryExecutor::new(RetryPolicy::chain_native());
//! let tx = executor
//!     .execute("get_transaction", || source.get_transaction(hash))
//!     .await?;
//! ```

use std::{fmt::Display, future::Future, time::Duration};

use tracing::{debug, warn};

use crate::errors::SourceError;

/// Default maximum number of retry attempts.
const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for exponential backoff (100ms).
const DEFAULT_BASE_DELAY_MS: u64 = 100;
/// Default maximum delay between retries (30 seconds).
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
/// Default growth factor between consecutive delays.
const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Retry behavior for one class of call sites
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not including the initial request).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied per attempt; values below 1.0 are treated as 1.0.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// Creates a builder for customizing a policy.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crossscan::transport::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::builder()
    ///     .max_retries(5)
    ///     .base_delay(Duration::from_millis(200))
    ///     .backoff_factor(1.5)
    ///     .build();
    /// assert_eq!(policy.max_retries, 5);
    /// ```
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Policy for chain-native lookups (transaction, receipt, block, balance).
    ///
    /// - 3 retry attempts
    /// - 200ms base delay
    /// - 5s maximum delay
    pub fn chain_native() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
        }
    }

    /// Policy for the cross-chain registry.
    ///
    /// The registry is only consulted as a fallback, so it gets fewer and
    /// slower attempts.
    pub fn cross_chain() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
        }
    }

    /// Policy for token `symbol()` / `name()` / `decimals()` calls.
    ///
    /// Metadata has heuristic fallbacks, so one quick retry is enough.
    pub fn token_metadata() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self)
    }
}

/// Builder for configuring a [`RetryPolicy`].
#[derive(Clone, Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.policy.max_retries = max_retries;
        self
    }

    /// Sets the base delay for exponential backoff.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.policy.base_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    ///
    /// Delays will be capped at this value regardless of the exponential calculation.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.policy.max_delay = delay;
        self
    }

    /// Sets the growth factor between consecutive delays.
    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.policy.backoff_factor = factor;
        self
    }

    /// Builds the configured [`RetryPolicy`].
    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}

/// Errors that know whether retrying can help
pub trait Retryable {
    /// `true` when the same call can never succeed
    fn is_non_retryable(&self) -> bool;
}

impl Retryable for SourceError {
    fn is_non_retryable(&self) -> bool {
        SourceError::is_non_retryable(self)
    }
}

/// Why an executed operation ultimately failed
#[derive(Debug, thiserror::Error)]
pub enum RetryFailure<E>
where
    E: std::error::Error + 'static,
{
    /// The first non-retryable failure, returned without further attempts
    #[error(transparent)]
    NonRetryable(E),

    /// Every attempt failed with a retryable error
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    Exhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: E,
    },
}

impl<E> RetryFailure<E>
where
    E: std::error::Error + 'static,
{
    /// The underlying error of the last attempt
    pub fn into_inner(self) -> E {
        match self {
            RetryFailure::NonRetryable(e) => e,
            RetryFailure::Exhausted { source, .. } => source,
        }
    }

    pub fn inner(&self) -> &E {
        match self {
            RetryFailure::NonRetryable(e) => e,
            RetryFailure::Exhausted { source, .. } => source,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryFailure::Exhausted { .. })
    }
}

/// Runs operations under a [`RetryPolicy`]
#[derive(Clone, Debug, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op`, classifying failures through [`Retryable`].
    pub async fn execute<T, E, F, Fut>(&self, operation: &str, op: F) -> Result<T, RetryFailure<E>>
    where
        E: std::error::Error + Retryable + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with(operation, op, |e: &E| e.is_non_retryable())
            .await
    }

    /// Run `op`, classifying failures with a caller-supplied predicate.
    pub async fn execute_with<T, E, F, Fut, P>(
        &self,
        operation: &str,
        mut op: F,
        is_non_retryable: P,
    ) -> Result<T, RetryFailure<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if is_non_retryable(&error) {
                        debug!(operation, error = %error, "Non-retryable error, not retrying");
                        return Err(RetryFailure::NonRetryable(error));
                    }

                    if attempt >= self.policy.max_retries {
                        warn!(
                            operation,
                            error = %error,
                            attempts = attempt + 1,
                            "Max retries exceeded"
                        );
                        return Err(RetryFailure::Exhausted {
                            operation: operation.to_string(),
                            attempts: attempt + 1,
                            source: error,
                        });
                    }

                    let delay = calculate_backoff(attempt, &self.policy);
                    log_backoff(operation, &error, attempt, &self.policy, delay);

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn log_backoff(
    operation: &str,
    error: &dyn Display,
    attempt: u32,
    policy: &RetryPolicy,
    delay: Duration,
) {
    warn!(
        operation,
        error = %error,
        attempt = attempt + 1,
        max_retries = policy.max_retries,
        delay_ms = delay.as_millis() as u64,
        "Retryable error, backing off"
    );
}

/// Calculates the backoff duration for a given attempt.
///
/// Uses exponential backoff: `min(base_delay * backoff_factor^attempt, max_delay)`
pub fn calculate_backoff(attempt: u32, policy: &RetryPolicy) -> Duration {
    let factor = if policy.backoff_factor.is_finite() {
        policy.backoff_factor.max(1.0)
    } else {
        DEFAULT_BACKOFF_FACTOR
    };
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let delay_secs = policy.base_delay.as_secs_f64() * factor.powi(exponent);

    if !delay_secs.is_finite() || delay_secs >= policy.max_delay.as_secs_f64() {
        return policy.max_delay;
    }
    Duration::try_from_secs_f64(delay_secs).unwrap_or(policy.max_delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::builder()
            .max_retries(max_retries)
            .base_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(2))
            .build()
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(policy.base_delay, Duration::from_millis(DEFAULT_BASE_DELAY_MS));
        assert_eq!(policy.max_delay, Duration::from_millis(DEFAULT_MAX_DELAY_MS));
        assert_eq!(policy.backoff_factor, DEFAULT_BACKOFF_FACTOR);
    }

    #[test]
    fn test_presets() {
        assert_eq!(RetryPolicy::chain_native().max_retries, 3);
        assert_eq!(RetryPolicy::cross_chain().max_retries, 2);
        assert_eq!(RetryPolicy::token_metadata().max_retries, 1);
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }

    #[test]
    fn test_calculate_backoff() {
        let policy = RetryPolicy::builder()
            .base_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .build();

        assert_eq!(calculate_backoff(0, &policy), Duration::from_millis(100));
        assert_eq!(calculate_backoff(1, &policy), Duration::from_millis(200));
        assert_eq!(calculate_backoff(2, &policy), Duration::from_millis(400));
        assert_eq!(calculate_backoff(3, &policy), Duration::from_millis(800));
    }

    #[test]
    fn test_calculate_backoff_custom_factor() {
        let policy = RetryPolicy::builder()
            .base_delay(Duration::from_millis(100))
            .backoff_factor(3.0)
            .build();
        assert_eq!(calculate_backoff(2, &policy), Duration::from_millis(900));

        // Factors below one never shrink the delay
        let policy = RetryPolicy::builder()
            .base_delay(Duration::from_millis(100))
            .backoff_factor(0.5)
            .build();
        assert_eq!(calculate_backoff(4, &policy), Duration::from_millis(100));
    }

    #[test]
    fn test_calculate_backoff_capped() {
        let policy = RetryPolicy::builder()
            .base_delay(Duration::from_millis(100))
            .max_delay(Duration::from_millis(500))
            .build();

        assert_eq!(calculate_backoff(3, &policy), Duration::from_millis(500));
        assert_eq!(calculate_backoff(10, &policy), Duration::from_millis(500));
    }

    #[test]
    fn test_calculate_backoff_overflow_protection() {
        let policy = RetryPolicy::builder()
            .base_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(60))
            .build();

        assert_eq!(calculate_backoff(5000, &policy), Duration::from_secs(60));
        assert_eq!(calculate_backoff(u32::MAX, &policy), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_policy(3));

        let result = executor
            .execute("flaky", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(SourceError::from_status("flaky", 503))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_short_circuits() {
        let calls = &AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_policy(5));

        let result: Result<(), _> = executor
            .execute("lookup", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SourceError::invalid_request("lookup", "bad hash"))
            })
            .await;

        let failure = result.unwrap_err();
        assert!(!failure.is_exhausted());
        assert!(matches!(failure, RetryFailure::NonRetryable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_until_exhausted() {
        let calls = &AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_policy(2));

        let result: Result<(), _> = executor
            .execute("lookup", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SourceError::from_status("lookup", 429))
            })
            .await;

        assert!(result.as_ref().is_err_and(RetryFailure::is_exhausted));
        match result {
            Err(RetryFailure::Exhausted {
                operation,
                attempts,
                source,
            }) => {
                assert_eq!(operation, "lookup");
                assert_eq!(attempts, 3);
                assert!(matches!(source, SourceError::RateLimited { .. }));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_custom_predicate() {
        let calls = &AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_policy(4));

        let result: Result<(), _> = executor
            .execute_with(
                "lookup",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(SourceError::from_status("lookup", 503))
                },
                |_| true,
            )
            .await;

        assert!(matches!(result, Err(RetryFailure::NonRetryable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
