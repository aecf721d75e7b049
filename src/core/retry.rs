//! Caller-level retry policy
//!
//! The workflow itself never retries. Callers that want retries wrap a whole
//! operation (usually a full aggregate request) with [`retry_transport`].

use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::core::error::Result;

/// Exponential backoff on transport failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retry
    pub const NONE: RetryPolicy = RetryPolicy { max_attempts: 1, base_delay: Duration::ZERO };

    pub fn new(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            base_delay: Duration::from_millis(500),
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * (1u32 << (attempt - 1).min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Run `operation`, retrying while it fails with a transport error
pub async fn retry_transport<F, Fut, T>(policy: RetryPolicy, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) if err.is_transport() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!("Transport failure (attempt {attempt}): {err}. Retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
