//! Deterministic `CompletionClient` for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{CompletionClient, CompletionError};

/// Answers by industry: the insight prompt carries the industry as a JSON
/// string literal after `INDUSTRY: `. Unknown industries get `Unavailable`.
#[derive(Default)]
pub struct StubCompletion {
    responses: HashMap<String, Result<String, CompletionError>>,
    calls: AtomicUsize,
}

impl StubCompletion {
    pub fn with(mut self, industry: &str, response: Result<String, CompletionError>) -> Self {
        self.responses.insert(industry.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers interleave before anyone persists.
        tokio::task::yield_now().await;
        self.responses
            .iter()
            .find(|(industry, _)| {
                let literal = serde_json::to_string(industry).unwrap_or_default();
                prompt.contains(&format!("INDUSTRY: {literal}"))
            })
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Err(CompletionError::Unavailable("no stub response".to_string())))
    }
}
