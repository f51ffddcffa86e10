//! Bounded retry with exponential backoff, driven by error kind.

use souk_core::{ErrorKind, UploadConfig, UploadError, UploadResult};
use std::future::Future;
use std::time::Duration;

/// Which failures to retry, how many attempts to make, and how long to wait.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    retryable: Vec<ErrorKind>,
}

impl RetryPolicy {
    /// Retries transient and configuration errors.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            retryable: vec![ErrorKind::Transient, ErrorKind::Configuration],
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay)
            .retry_configuration_errors(config.retry_configuration_errors)
    }

    /// Replace the set of retryable kinds.
    pub fn with_retryable(mut self, kinds: &[ErrorKind]) -> Self {
        self.retryable = kinds.to_vec();
        self
    }

    pub fn retry_configuration_errors(mut self, enabled: bool) -> Self {
        self.retryable.retain(|k| *k != ErrorKind::Configuration);
        if enabled {
            self.retryable.push(ErrorKind::Configuration);
        }
        self
    }

    pub fn is_retryable(&self, err: &UploadError) -> bool {
        self.retryable.contains(&err.kind())
    }

    /// Delay after failed attempt `attempt` (0-based): `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or the
/// attempt budget runs out.
///
/// The closure receives the 0-based attempt number. A non-retryable error is
/// returned as is; running out of attempts wraps the last error in
/// [`UploadError::RetriesExhausted`].
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> UploadResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = UploadResult<T>>,
{
    let mut attempt = 0;
    loop {
        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !policy.is_retryable(&err) {
            tracing::error!(attempt = attempt + 1, error = %err, "Non-retryable failure");
            return Err(err);
        }

        if attempt + 1 >= policy.max_attempts {
            tracing::error!(
                attempts = attempt + 1,
                error = %err,
                "Retries exhausted"
            );
            return Err(UploadError::RetriesExhausted {
                attempts: attempt + 1,
                last: Box::new(err),
            });
        }

        let delay = policy.delay_for(attempt);
        if err.kind() == ErrorKind::Configuration {
            // Retrying cannot fix a missing bucket or a denied policy.
            tracing::warn!(
                attempt = attempt + 1,
                error_code = err.error_code(),
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying storage configuration error"
            );
        } else {
            tracing::warn!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Attempt failed, retrying"
            );
        }

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
