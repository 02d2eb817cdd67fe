//! Bounded retry with exponential backoff for upstream calls
//!
//! Every outbound E-utilities request goes through [`with_retry`]. The policy is
//! fixed per client: callers never customise it per call.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::jitter;
use tracing::{debug, warn};

/// Errors that can tell whether a retry may succeed
pub trait RetryableError {
    /// Whether the failure is transient
    fn is_retryable(&self) -> bool;

    /// Short human-readable reason, used in logs
    fn retry_reason(&self) -> &str;
}

/// Retry policy applied uniformly to all upstream calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
    /// Randomise each delay to avoid synchronised retries
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(16),
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Delays between attempts, capped at `max_delay`, before jitter
    pub fn delays(&self) -> Vec<Duration> {
        let initial = self.initial_delay.as_secs_f64();
        let cap = self.max_delay.as_secs_f64();

        (0..self.max_retries)
            .map(|n| {
                let secs = initial * self.backoff_multiplier.powi(n as i32);
                Duration::from_secs_f64(secs.min(cap))
            })
            .collect()
    }
}

/// Run `operation`, retrying transient failures according to `config`.
///
/// Non-retryable errors are returned immediately. When the retry budget is
/// spent, the last error is returned.
pub async fn with_retry<F, Fut, T, E>(operation: F, config: &RetryConfig, label: &str) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let use_jitter = config.use_jitter;
    let strategy = config
        .delays()
        .into_iter()
        .map(move |d| if use_jitter { jitter(d) } else { d });

    let max_retries = config.max_retries;
    let mut failures = 0usize;

    let result = RetryIf::start(strategy, operation, |err: &E| {
        failures += 1;
        let retryable = err.is_retryable();
        if retryable && failures <= max_retries {
            warn!(
                operation = label,
                attempt = failures,
                max_retries,
                reason = err.retry_reason(),
                error = %err,
                "Transient failure, retrying"
            );
        }
        retryable
    })
    .await;

    if result.is_ok() && failures > 0 {
        debug!(operation = label, retries = failures, "Succeeded after retrying");
    }

    result
}
