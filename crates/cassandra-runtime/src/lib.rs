//! # cassandra-runtime
//!
//! Networked half of the Cassandra claim-verification pipeline.
//!
//! This crate wires the deterministic pieces of `cassandra-core` to three
//! external collaborators:
//! - a web search provider ([`search`]), Tavily behind the `tavily` feature
//! - a language model ([`providers`]), Gemini behind the `gemini` feature
//! - a graph store ([`graph`]), Neo4j behind the `neo4j` feature
//!
//! ## Important
//!
//! Stages never return errors. Every collaborator failure is folded into the
//! state as a fail-open update, so a claim always reaches a terminal status
//! and never defaults to DEBUNKED.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cassandra_runtime::{OrchestratorBuilder, RuntimeConfig};
//!
//! let config = RuntimeConfig::load(None)?;
//! let orchestrator = OrchestratorBuilder::from_config(config)?.build()?;
//!
//! let outcome = orchestrator.verify("The moon landing was staged").await?;
//! println!("{} ({}%)", outcome.report.verdict, outcome.report.confidence);
//! ```

pub mod agents;
pub mod check;
pub mod config;
pub mod graph;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod search;
pub mod usage;

#[cfg(test)]
mod testutil;

pub use agents::{
    Archivist, ContradictionAuditor, Editor, Evidence, EvidenceGatherer, GraphPersister,
    HypothesisExtractor, Journalist, Stage, StageKind,
};
pub use check::{CheckResult, CheckStatus, CheckTarget, ConnectionCheck};
pub use config::{ConfigError, GraphConfig, ModelConfig, RuntimeConfig, SearchConfig};
pub use graph::{GraphError, GraphStore};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RuntimeError, VerificationOutcome};
pub use providers::{LlmProvider, ProviderError, ProviderRegistry};
pub use search::{SearchDepth, SearchError, SearchProvider};
pub use usage::{LlmUsage, MeteredProvider};
