//! Hypothesis extraction through the language model.

use cassandra_core::HypothesisReply;
use std::sync::Arc;
use tracing::{debug, info};

use crate::prompts::journalist_prompt;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// Asks the model for a hypothesis and a confidence score.
pub struct HypothesisExtractor {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
}

impl HypothesisExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            completion,
        }
    }

    /// Only a failed model call is an error. An unparseable reply decodes
    /// to the defaults.
    pub async fn extract(
        &self,
        claim: &str,
        context: &str,
    ) -> Result<HypothesisReply, ProviderError> {
        let prompt = journalist_prompt(claim, context);
        debug!(estimated_tokens = self.provider.estimate_tokens(&prompt), "Requesting hypothesis");

        let response = self
            .provider
            .complete(vec![ChatMessage::user(prompt)], &self.completion)
            .await?;

        let reply = HypothesisReply::parse(&response.content);
        info!(
            provider = self.provider.name(),
            confidence = reply.confidence,
            "Hypothesis extracted"
        );
        Ok(reply)
    }
}
