//! Language-model usage metering.
//!
//! [`MeteredProvider`] wraps any [`LlmProvider`] and accumulates token usage
//! for the claim in flight. The orchestrator resets it per claim.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

/// Accumulated LLM usage for one claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Total tokens used
    pub total_tokens: u32,

    /// Prompt/input tokens
    pub prompt_tokens: u32,

    /// Completion/output tokens
    pub completion_tokens: u32,

    /// Successful LLM calls
    pub llm_calls: u32,

    /// Calls that returned an error
    pub failed_calls: u32,
}

impl LlmUsage {
    /// Add token usage from a provider response.
    pub fn add(&mut self, usage: &TokenUsage) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total();
        self.llm_calls += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_calls += 1;
    }
}

/// Provider decorator that records usage of every call.
pub struct MeteredProvider {
    inner: Arc<dyn LlmProvider>,
    usage: RwLock<LlmUsage>,
}

impl MeteredProvider {
    pub fn new(inner: Arc<dyn LlmProvider>) -> Self {
        Self {
            inner,
            usage: RwLock::new(LlmUsage::default()),
        }
    }

    /// Snapshot of usage since the last reset.
    pub fn usage(&self) -> LlmUsage {
        self.usage.read().clone()
    }

    /// Clear accumulated usage.
    pub fn reset(&self) {
        *self.usage.write() = LlmUsage::default();
    }

    /// Return the accumulated usage and clear it.
    pub fn take(&self) -> LlmUsage {
        std::mem::take(&mut *self.usage.write())
    }
}

impl std::fmt::Debug for MeteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeteredProvider")
            .field("inner", &self.inner.name())
            .field("usage", &*self.usage.read())
            .finish()
    }
}

#[async_trait]
impl LlmProvider for MeteredProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let result = self.inner.complete(messages, config).await;
        match &result {
            Ok(response) => self.usage.write().add(&response.usage),
            Err(_) => self.usage.write().record_failure(),
        }
        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        self.inner.estimate_tokens(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedProvider;

    #[test]
    fn test_usage_add() {
        let mut usage = LlmUsage::default();
        usage.add(&TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 20,
        });
        usage.add(&TokenUsage {
            prompt_tokens: 50,
            completion_tokens: 5,
        });

        assert_eq!(usage.llm_calls, 2);
        assert_eq!(usage.prompt_tokens, 150);
        assert_eq!(usage.completion_tokens, 25);
        assert_eq!(usage.total_tokens, 175);
    }

    #[tokio::test]
    async fn test_metered_provider_counts_calls() {
        let inner = Arc::new(
            ScriptedProvider::new(vec![Ok("{}".to_string()), Err("boom".to_string())])
                .with_usage(10, 4),
        );
        let metered = MeteredProvider::new(inner.clone());
        let config = CompletionConfig::default();

        assert!(metered.complete(vec![ChatMessage::user("a")], &config).await.is_ok());
        assert!(metered.complete(vec![ChatMessage::user("b")], &config).await.is_err());

        let usage = metered.usage();
        assert_eq!(usage.llm_calls, 1);
        assert_eq!(usage.failed_calls, 1);
        assert_eq!(usage.total_tokens, 14);
        assert_eq!(inner.calls(), 2);
        assert_eq!(metered.name(), "scripted");
    }

    #[tokio::test]
    async fn test_take_resets() {
        let inner = Arc::new(ScriptedProvider::always("{}").with_usage(3, 3));
        let metered = MeteredProvider::new(inner);
        let config = CompletionConfig::default();

        metered.complete(vec![ChatMessage::user("a")], &config).await.unwrap();
        assert_eq!(metered.take().total_tokens, 6);
        assert_eq!(metered.usage(), LlmUsage::default());

        metered.complete(vec![ChatMessage::user("a")], &config).await.unwrap();
        metered.reset();
        assert_eq!(metered.usage().llm_calls, 0);
    }
}
