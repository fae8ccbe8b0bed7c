//! The three pipeline stages.

use async_trait::async_trait;
use cassandra_core::{ClaimVerificationState, StateUpdate};
use tracing::{info, warn};

use super::traits::{Stage, StageKind};
use super::{ContradictionAuditor, EvidenceGatherer, GraphPersister, HypothesisExtractor};

/// Research: gather evidence, then form a hypothesis.
pub struct Journalist {
    gatherer: EvidenceGatherer,
    extractor: HypothesisExtractor,
}

impl Journalist {
    pub fn new(gatherer: EvidenceGatherer, extractor: HypothesisExtractor) -> Self {
        Self {
            gatherer,
            extractor,
        }
    }
}

#[async_trait]
impl Stage for Journalist {
    fn kind(&self) -> StageKind {
        StageKind::Journalist
    }

    async fn run(&self, state: &ClaimVerificationState) -> StateUpdate {
        let claim = state.claim();
        info!(stage = %self.kind(), claim, "Researching claim");

        // A failed search skips the model call entirely
        let evidence = match self.gatherer.gather(claim).await {
            Ok(evidence) => evidence,
            Err(e) => {
                warn!(stage = %self.kind(), error = %e, "Search failed");
                return StateUpdate::research_failed(e);
            }
        };

        if evidence.is_empty() {
            warn!(stage = %self.kind(), "Search returned no sources, asking model without context");
        }

        match self.extractor.extract(claim, &evidence.context).await {
            Ok(reply) => {
                info!(
                    stage = %self.kind(),
                    sources = evidence.sources.len(),
                    confidence = reply.confidence,
                    "Research complete"
                );
                StateUpdate::researched(reply.hypothesis, evidence.sources, reply.confidence)
            }
            Err(e) => {
                warn!(stage = %self.kind(), error = %e, "Hypothesis extraction failed");
                StateUpdate::research_failed(e)
            }
        }
    }
}

/// Audit: try to falsify the hypothesis.
pub struct Editor {
    auditor: ContradictionAuditor,
}

impl Editor {
    pub fn new(auditor: ContradictionAuditor) -> Self {
        Self { auditor }
    }
}

#[async_trait]
impl Stage for Editor {
    fn kind(&self) -> StageKind {
        StageKind::Editor
    }

    async fn run(&self, state: &ClaimVerificationState) -> StateUpdate {
        info!(stage = %self.kind(), "Auditing hypothesis");

        match self.auditor.audit(state.claim(), &state.hypothesis).await {
            Ok(reply) => {
                StateUpdate::audited(reply.contradiction_found, reply.evidence, reply.kill_score)
            }
            Err(e) => {
                warn!(stage = %self.kind(), error = %e, "Audit failed, claim stands");
                StateUpdate::audit_failed(e)
            }
        }
    }
}

/// Archive: record the verdict and set the terminal status.
pub struct Archivist {
    persister: GraphPersister,
}

impl Archivist {
    pub fn new(persister: GraphPersister) -> Self {
        Self { persister }
    }
}

#[async_trait]
impl Stage for Archivist {
    fn kind(&self) -> StageKind {
        StageKind::Archivist
    }

    async fn run(&self, state: &ClaimVerificationState) -> StateUpdate {
        info!(stage = %self.kind(), "Updating truth graph");
        StateUpdate::status(self.persister.persist(state).await)
    }
}
