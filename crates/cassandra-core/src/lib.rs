//! # cassandra-core
//!
//! Deterministic building blocks of the Cassandra claim-verification pipeline.
//!
//! This crate owns everything that does not need the network:
//! - The shared [`ClaimVerificationState`] and its shallow-merge rule
//! - The fail-open [`defaults`] every stage falls back to
//! - Tolerant JSON extraction from language-model replies
//! - Planning of the truth-graph write transaction
//! - Derivation of the final [`VerificationReport`]
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output, apart from
//!    the wall-clock `verified_at` stamp of [`VerificationReport::from_state`]
//!    (use [`VerificationReport::from_state_at`] to pin it)
//! 2. **No I/O**: Collaborators live in `cassandra-runtime`
//! 3. **Fail-open**: No default ever marks a claim DEBUNKED
//!
//! ## Example
//!
//! ```rust
//! use cassandra_core::{ClaimVerificationState, HypothesisReply, StateUpdate, Status};
//!
//! let mut state = ClaimVerificationState::new("The moon landing was staged").unwrap();
//! let reply = HypothesisReply::parse(r#"Here you go: {"hypothesis": "False", "confidence": 85}"#);
//! state.apply(StateUpdate::researched(reply.hypothesis, vec![], reply.confidence));
//!
//! assert_eq!(state.confidence, 85);
//! assert_eq!(state.status, Status::Researched);
//! ```

pub mod defaults;
pub mod extract;
pub mod graph;
pub mod report;
pub mod state;

pub use extract::{
    extract_json, extract_mapping, AuditReply, ExtractError, HypothesisReply, Mapping,
};
pub use graph::{plan_truth_graph, CypherStatement, VerdictRecord};
pub use report::VerificationReport;
pub use state::{ClaimVerificationState, StateError, StateUpdate, Status, Verdict};
