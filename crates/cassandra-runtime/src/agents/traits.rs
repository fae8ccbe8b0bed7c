//! Stage trait and common types.

use async_trait::async_trait;
use cassandra_core::{ClaimVerificationState, StateUpdate};
use std::fmt;

/// The three pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Journalist,
    Editor,
    Archivist,
}

impl StageKind {
    pub const ORDER: [StageKind; 3] = [
        StageKind::Journalist,
        StageKind::Editor,
        StageKind::Archivist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Journalist => "journalist",
            StageKind::Editor => "editor",
            StageKind::Archivist => "archivist",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step of the verification pipeline.
///
/// # Isolation Contract
/// - Receives the full accumulated state, returns only the fields it sets
/// - Never returns an error: collaborator failures become fail-open updates
/// - Never reads fields that a later stage produces
#[async_trait]
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Compute this stage's partial update.
    async fn run(&self, state: &ClaimVerificationState) -> StateUpdate;
}
