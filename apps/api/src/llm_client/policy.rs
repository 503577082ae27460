//! Composable call policies for any `CompletionClient`.
//!
//! Production wiring: `WithRetry::new(WithTimeout::new(LlmClient, ..), ..)`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{CompletionClient, CompletionError};

/// Bounds every `complete` call of the inner client.
pub struct WithTimeout<C> {
    inner: C,
    timeout: Duration,
}

impl<C> WithTimeout<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<C: CompletionClient> CompletionClient for WithTimeout<C> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        match tokio::time::timeout(self.timeout, self.inner.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout(self.timeout)),
        }
    }
}

/// Longest single wait between attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (1-based): base, 2×base, 4×base...,
/// capped at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Retries transient failures with exponential backoff.
pub struct WithRetry<C> {
    inner: C,
    max_attempts: u32,
    base_delay: Duration,
}

impl<C> WithRetry<C> {
    pub fn new(inner: C, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }
}

#[async_trait]
impl<C: CompletionClient> CompletionClient for WithRetry<C> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut attempt = 1;
        loop {
            match self.inner.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = backoff_delay(self.base_delay, attempt);
                    warn!(
                        "Completion attempt {}/{} failed ({e}), retrying after {}ms...",
                        attempt,
                        self.max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
