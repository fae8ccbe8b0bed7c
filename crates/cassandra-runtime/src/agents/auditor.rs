//! Adversarial audit through the language model.

use cassandra_core::AuditReply;
use std::sync::Arc;
use tracing::info;

use crate::prompts::editor_prompt;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// Asks the model to falsify a hypothesis.
pub struct ContradictionAuditor {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
}

impl ContradictionAuditor {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            completion,
        }
    }

    pub async fn audit(&self, claim: &str, hypothesis: &str) -> Result<AuditReply, ProviderError> {
        let response = self
            .provider
            .complete(
                vec![ChatMessage::user(editor_prompt(claim, hypothesis))],
                &self.completion,
            )
            .await?;

        let reply = AuditReply::parse(&response.content);
        info!(
            contradiction_found = reply.contradiction_found,
            kill_score = reply.kill_score,
            "Audit complete"
        );
        Ok(reply)
    }
}
