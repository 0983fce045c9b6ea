//! Retry Mechanism Module
//!
//! Bounded retries for side-effect-free requests. When every attempt fails the
//! executor reports the error from the *first* attempt.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::defaults;
use crate::error::ApiSuiteError;
use crate::types::Method;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts after the first one; the transport runs at most `max_retries + 1` times
    pub max_retries: u32,
    /// Verbs eligible for retry; every other verb gets exactly one attempt
    pub retryable_methods: BTreeSet<Method>,
    /// Delay before the first retry (zero disables backoff)
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier (for exponential backoff)
    pub backoff_multiplier: f64,
    /// Whether to add jitter to delays
    pub use_jitter: bool,
    /// Maximum jitter percentage (0.0 to 1.0)
    pub jitter_factor: f64,
    /// Custom retry condition function
    pub retry_condition: Option<fn(&ApiSuiteError) -> bool>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::retry::MAX_RETRIES,
            retryable_methods: [Method::Get, Method::Head, Method::Options]
                .into_iter()
                .collect(),
            initial_delay: Duration::ZERO,
            max_delay: defaults::retry::MAX_DELAY,
            backoff_multiplier: defaults::retry::BACKOFF_MULTIPLIER,
            use_jitter: false,
            jitter_factor: defaults::retry::JITTER_FACTOR,
            retry_condition: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single attempt for every verb.
    pub fn none() -> Self {
        Self::default().with_max_retries(0)
    }

    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retryable_methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.retryable_methods = methods.into_iter().collect();
        self
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub const fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    pub const fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn with_retry_condition(mut self, condition: fn(&ApiSuiteError) -> bool) -> Self {
        self.retry_condition = Some(condition);
        self
    }

    /// Total attempts allowed for `method`.
    pub fn attempts_for(&self, method: Method) -> u32 {
        if self.retryable_methods.contains(&method) {
            self.max_retries.saturating_add(1)
        } else {
            1
        }
    }

    pub fn should_retry(&self, error: &ApiSuiteError) -> bool {
        match self.retry_condition {
            Some(condition) => condition(error),
            None => error.is_retryable(),
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let delay = Duration::from_millis(base_delay.min(u64::MAX as f64) as u64).min(self.max_delay);

        if self.use_jitter {
            self.add_jitter(delay)
        } else {
            delay
        }
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        let mut rng = rand::thread_rng();
        let jitter_range = delay.as_millis() as f64 * self.jitter_factor;
        let jitter = rng.gen_range(-jitter_range..=jitter_range);

        let new_delay = delay.as_millis() as f64 + jitter;
        Duration::from_millis(new_delay.max(0.0) as u64)
    }
}

/// Runs an operation under a `RetryPolicy`.
pub struct RetryExecutor<'a> {
    policy: &'a RetryPolicy,
}

impl<'a> RetryExecutor<'a> {
    pub const fn new(policy: &'a RetryPolicy) -> Self {
        Self { policy }
    }

    /// Execute `operation` for a request using `method`.
    ///
    /// Stops at the first success or at the first error the policy refuses to
    /// retry; in every failure case the error of the first attempt is returned.
    pub async fn execute<F, Fut, T>(&self, method: Method, mut operation: F) -> Result<T, ApiSuiteError>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiSuiteError>>,
    {
        let attempts = self.policy.attempts_for(method);
        let mut first_error: Option<ApiSuiteError> = None;

        for attempt in 0..attempts {
            match operation(attempt).await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    let retry = self.policy.should_retry(&error) && attempt + 1 < attempts;
                    if retry {
                        tracing::warn!(
                            method = %method,
                            attempt = attempt + 1,
                            max_attempts = attempts,
                            error = %error,
                            "request attempt failed, retrying"
                        );
                    }
                    let first = first_error.get_or_insert(error);
                    if !retry {
                        return Err(first.clone());
                    }

                    let delay = self.policy.calculate_delay(attempt);
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            ApiSuiteError::NetworkError("retry executor ran zero attempts".to_string())
        }))
    }
}
