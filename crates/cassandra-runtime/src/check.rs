//! Connection checks for the model and the graph store.
//!
//! Each check makes one real round trip: a minimal `generateContent` call for
//! the model and `RETURN 1` for the graph. Nothing here touches claim state.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::graph::GraphStore;
use crate::providers::{CompletionConfig, LlmProvider};

/// What a check talked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTarget {
    Model,
    Graph,
}

impl CheckTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckTarget::Model => "model",
            CheckTarget::Graph => "graph",
        }
    }
}

impl fmt::Display for CheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed(String),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub target: CheckTarget,
    pub status: CheckStatus,
}

impl CheckResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, CheckStatus::Failed(_))
    }
}

enum Collaborator<T> {
    Ready(T),
    Invalid(String),
    Absent(String),
}

/// Runs the connection checks.
pub struct ConnectionCheck {
    model: Collaborator<Arc<dyn LlmProvider>>,
    graph: Collaborator<Arc<dyn GraphStore>>,
    completion: CompletionConfig,
}

impl ConnectionCheck {
    /// Nothing to check yet; both targets report as skipped.
    pub fn new(completion: CompletionConfig) -> Self {
        Self {
            model: Collaborator::Absent("no model provider".to_string()),
            graph: Collaborator::Absent("graph store not configured".to_string()),
            completion,
        }
    }

    pub fn model(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.model = Collaborator::Ready(provider);
        self
    }

    /// Report the model as failed without calling it.
    pub fn model_invalid(mut self, reason: impl Into<String>) -> Self {
        self.model = Collaborator::Invalid(reason.into());
        self
    }

    pub fn graph(mut self, store: Arc<dyn GraphStore>) -> Self {
        self.graph = Collaborator::Ready(store);
        self
    }

    pub fn graph_invalid(mut self, reason: impl Into<String>) -> Self {
        self.graph = Collaborator::Invalid(reason.into());
        self
    }

    /// Checks for the built-in backends selected by `config`.
    ///
    /// A model config the registry rejects, such as a missing key, fails
    /// without a request. An unconfigured graph is skipped.
    #[cfg(all(feature = "gemini", feature = "neo4j"))]
    pub fn from_config(config: &crate::config::RuntimeConfig) -> Self {
        use crate::graph::Neo4jStore;
        use crate::providers::ProviderRegistry;

        let mut check = Self::new(config.model.completion());

        let registry = ProviderRegistry::with_defaults();
        check = match registry
            .validate(&config.model)
            .and_then(|()| registry.create(&config.model))
        {
            Ok(provider) => check.model(provider),
            Err(e) => check.model_invalid(e.to_string()),
        };

        if config.graph.is_configured() {
            check = match Neo4jStore::from_config(&config.graph) {
                Ok(store) => check.graph(Arc::new(store)),
                Err(e) => check.graph_invalid(e.to_string()),
            };
        } else {
            check.graph = Collaborator::Absent(
                "NEO4J_URI or NEO4J_PASSWORD not set, verdicts will not be archived".to_string(),
            );
        }

        check
    }

    /// Run every check, model first.
    pub async fn run(&self) -> Vec<CheckResult> {
        let model = match &self.model {
            Collaborator::Ready(provider) => {
                match provider.health_check(&self.completion).await {
                    Ok(()) => CheckStatus::Passed(format!(
                        "{} answered with {}",
                        provider.name(),
                        self.completion.model
                    )),
                    Err(e) => CheckStatus::Failed(e.to_string()),
                }
            }
            Collaborator::Invalid(reason) => CheckStatus::Failed(reason.clone()),
            Collaborator::Absent(reason) => CheckStatus::Skipped(reason.clone()),
        };

        let graph = match &self.graph {
            Collaborator::Ready(store) => match store.ping().await {
                Ok(()) => CheckStatus::Passed(format!("{} accepted a query", store.name())),
                Err(e) => CheckStatus::Failed(e.to_string()),
            },
            Collaborator::Invalid(reason) => CheckStatus::Failed(reason.clone()),
            Collaborator::Absent(reason) => CheckStatus::Skipped(reason.clone()),
        };

        let results = vec![
            CheckResult {
                target: CheckTarget::Model,
                status: model,
            },
            CheckResult {
                target: CheckTarget::Graph,
                status: graph,
            },
        ];

        for result in &results {
            match &result.status {
                CheckStatus::Failed(reason) => {
                    warn!(check = %result.target, reason = %reason, "Connection check failed")
                }
                status => info!(check = %result.target, status = ?status, "Connection check"),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HEALTH_CHECK_PROMPT;
    use crate::testutil::{RecordingGraph, ScriptedProvider};

    fn status(results: &[CheckResult], target: CheckTarget) -> &CheckStatus {
        &results
            .iter()
            .find(|r| r.target == target)
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_all_reachable() {
        let provider = Arc::new(ScriptedProvider::always("OK"));
        let graph = Arc::new(RecordingGraph::new());
        let check = ConnectionCheck::new(CompletionConfig::default())
            .model(provider.clone())
            .graph(graph.clone());

        let results = check.run().await;
        assert!(matches!(status(&results, CheckTarget::Model), CheckStatus::Passed(_)));
        assert!(matches!(status(&results, CheckTarget::Graph), CheckStatus::Passed(_)));
        assert!(!results.iter().any(CheckResult::is_failure));

        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.prompts(), vec![HEALTH_CHECK_PROMPT.to_string()]);
        assert_eq!(graph.pings(), 1);
        // a connection check never writes
        assert_eq!(graph.calls(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_reported() {
        let check = ConnectionCheck::new(CompletionConfig::default())
            .model(Arc::new(ScriptedProvider::failing("connection reset")))
            .graph(Arc::new(RecordingGraph::failing("auth failure")));

        let results = check.run().await;
        match status(&results, CheckTarget::Model) {
            CheckStatus::Failed(reason) => assert!(reason.contains("connection reset")),
            other => panic!("Expected model failure, got {:?}", other),
        }
        match status(&results, CheckTarget::Graph) {
            CheckStatus::Failed(reason) => assert!(reason.contains("auth failure")),
            other => panic!("Expected graph failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_model_is_not_called() {
        let check = ConnectionCheck::new(CompletionConfig::default())
            .model_invalid("Google API key required");

        let results = check.run().await;
        assert_eq!(
            status(&results, CheckTarget::Model),
            &CheckStatus::Failed("Google API key required".to_string())
        );
        assert!(matches!(status(&results, CheckTarget::Graph), CheckStatus::Skipped(_)));
    }

    #[cfg(all(feature = "gemini", feature = "neo4j"))]
    #[tokio::test]
    async fn test_from_config_without_keys() {
        let results = ConnectionCheck::from_config(&crate::config::RuntimeConfig::default())
            .run()
            .await;

        match status(&results, CheckTarget::Model) {
            CheckStatus::Failed(reason) => assert!(reason.contains("GOOGLE_API_KEY")),
            other => panic!("Expected model failure, got {:?}", other),
        }
        assert!(matches!(status(&results, CheckTarget::Graph), CheckStatus::Skipped(_)));
    }
}
