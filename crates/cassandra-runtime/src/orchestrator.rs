//! Runtime orchestrator for sequential claim verification.
//!
//! The orchestrator:
//! - Creates the state record for a claim
//! - Folds the stages over it in order (Journalist, Editor, Archivist)
//! - Derives the final report
//!
//! Stages never fail, so once a claim is accepted the pipeline always runs to
//! a terminal status.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use cassandra_core::{ClaimVerificationState, StateError, VerificationReport};

use crate::agents::{
    Archivist, ContradictionAuditor, Editor, EvidenceGatherer, GraphPersister,
    HypothesisExtractor, Journalist, Stage,
};
use crate::config::RuntimeConfig;
use crate::graph::GraphStore;
use crate::providers::LlmProvider;
use crate::search::SearchProvider;
use crate::usage::{LlmUsage, MeteredProvider};

/// Errors from the runtime orchestrator.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Claim must not be empty")]
    EmptyClaim,

    #[error("Orchestrator not configured: {0}")]
    NotConfigured(String),
}

impl From<StateError> for RuntimeError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::EmptyClaim => RuntimeError::EmptyClaim,
        }
    }
}

/// Result of verifying one claim.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// Terminal state
    pub state: ClaimVerificationState,

    /// User-facing verdict
    pub report: VerificationReport,

    /// Model usage for this claim
    pub usage: LlmUsage,
}

/// Runs claims through the stages, one at a time.
pub struct Orchestrator {
    stages: Vec<Box<dyn Stage>>,
    meter: Option<Arc<MeteredProvider>>,
}

impl Orchestrator {
    /// Orchestrator over an explicit stage list.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages,
            meter: None,
        }
    }

    fn with_meter(mut self, meter: Arc<MeteredProvider>) -> Self {
        self.meter = Some(meter);
        self
    }

    /// Verify a claim.
    ///
    /// The only error is an empty claim; collaborator failures end up in the
    /// report fields instead.
    pub async fn verify(&self, claim: &str) -> Result<VerificationOutcome, RuntimeError> {
        let initial = ClaimVerificationState::new(claim)?;
        if let Some(meter) = &self.meter {
            meter.reset();
        }

        info!(claim = initial.claim(), stages = self.stages.len(), "Verification started");

        let mut state = initial;
        for stage in &self.stages {
            let update = stage.run(&state).await;
            state.apply(update);
            info!(stage = %stage.kind(), status = %state.status, "Stage finished");
        }

        let report = VerificationReport::from_state(&state);
        let usage = self.meter.as_ref().map(|m| m.take()).unwrap_or_default();

        info!(
            verdict = %report.verdict,
            status = %report.status,
            confidence = report.confidence,
            kill_score = report.kill_score,
            llm_calls = usage.llm_calls,
            "Verification complete"
        );

        Ok(VerificationOutcome {
            state,
            report,
            usage,
        })
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.kind().as_str()).collect()
    }
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    search: Option<Arc<dyn SearchProvider>>,
    graph: Option<Arc<dyn GraphStore>>,
    config: RuntimeConfig,
}

impl OrchestratorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            provider: None,
            search: None,
            graph: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the LLM provider.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the search provider.
    pub fn search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Set the graph store. It is only used when `config.graph` is configured.
    pub fn graph(mut self, graph: Arc<dyn GraphStore>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder with the built-in backends selected by `config`.
    ///
    /// Missing search or model keys do not fail here: the unconfigured
    /// collaborator reports the missing key at call time.
    #[cfg(all(feature = "gemini", feature = "tavily", feature = "neo4j"))]
    pub fn from_config(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        use crate::graph::Neo4jStore;
        use crate::providers::ProviderRegistry;
        use crate::search::{TavilySearch, UnconfiguredSearch};

        let registry = ProviderRegistry::with_defaults();
        let provider = registry
            .create(&config.model)
            .map_err(|e| RuntimeError::NotConfigured(e.to_string()))?;

        let search: Arc<dyn SearchProvider> = match &config.search.api_key {
            Some(key) => Arc::new(
                TavilySearch::new(key.clone(), config.search.timeout)
                    .map_err(|e| RuntimeError::NotConfigured(e.to_string()))?,
            ),
            None => Arc::new(UnconfiguredSearch),
        };

        let mut builder = Self::new().provider(provider).search(search);
        if config.graph.is_configured() {
            let store = Neo4jStore::from_config(&config.graph)
                .map_err(|e| RuntimeError::NotConfigured(e.to_string()))?;
            builder = builder.graph(Arc::new(store));
        }

        Ok(builder.config(config))
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<Orchestrator, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::NotConfigured("No provider set".to_string()))?;
        let search = self
            .search
            .ok_or_else(|| RuntimeError::NotConfigured("No search provider set".to_string()))?;

        let meter = Arc::new(MeteredProvider::new(provider));
        let completion = self.config.model.completion();

        let journalist = Journalist::new(
            EvidenceGatherer::new(search, self.config.search.clone()),
            HypothesisExtractor::new(meter.clone(), completion.clone()),
        );
        let editor = Editor::new(ContradictionAuditor::new(meter.clone(), completion));
        let persister = match self.graph {
            Some(graph) => GraphPersister::new(graph, &self.config.graph),
            None => GraphPersister::disabled(),
        };

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(journalist),
            Box::new(editor),
            Box::new(Archivist::new(persister)),
        ];

        Ok(Orchestrator::new(stages).with_meter(meter))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
