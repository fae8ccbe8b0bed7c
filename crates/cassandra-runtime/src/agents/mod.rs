//! Pipeline agents.
//!
//! Four components do the work, each owning its collaborators:
//! - [`EvidenceGatherer`]: web search for the claim
//! - [`HypothesisExtractor`]: model-backed hypothesis and confidence
//! - [`ContradictionAuditor`]: adversarial model audit
//! - [`GraphPersister`]: truth-graph archive
//!
//! Three [`Stage`]s wrap them for the orchestrator: the Journalist
//! (gather + extract), the Editor (audit) and the Archivist (persist).

mod auditor;
mod extractor;
mod gatherer;
mod persister;
mod stages;
mod traits;

pub use auditor::ContradictionAuditor;
pub use extractor::HypothesisExtractor;
pub use gatherer::{Evidence, EvidenceGatherer};
pub use persister::GraphPersister;
pub use stages::{Archivist, Editor, Journalist};
pub use traits::{Stage, StageKind};
