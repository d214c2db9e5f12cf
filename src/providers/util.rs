use crate::core::config::SourceConfig;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how far apart a failed request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry attempts after the first one
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }
}

impl From<&SourceConfig> for RetryPolicy {
    fn from(config: &SourceConfig) -> Self {
        Self {
            retries: config.retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Connection failures, timeouts and server-side errors are worth another try;
/// anything else will fail the same way again.
pub fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect()
        || err.is_timeout()
        || err.status().is_some_and(|status| status.is_server_error())
}

/// Runs `operation` until it succeeds, fails with a non-transient error, or
/// the policy's retries are used up.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    policy: RetryPolicy,
) -> Result<T, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.retries && is_transient(&err) => {
                attempt += 1;
                debug!(attempt, retries = policy.retries, error = %err, "Request failed, retrying");
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
