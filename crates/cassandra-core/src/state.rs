//! The shared verification record threaded through the pipeline.
//!
//! A [`ClaimVerificationState`] is created once per claim with status
//! [`Status::New`]. Every stage reads the accumulated state and returns a
//! [`StateUpdate`]; the orchestrator applies it with a shallow merge where
//! each field the update defines overwrites the accumulated one.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::defaults;

/// Errors raised while constructing verification state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Claim must not be empty")]
    EmptyClaim,
}

/// Lifecycle position of a claim.
///
/// The path is strictly linear:
/// `new -> researched -> audited -> {VERIFIED | DEBUNKED | error | skipped_db}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "researched")]
    Researched,
    #[serde(rename = "audited")]
    Audited,
    #[serde(rename = "VERIFIED")]
    Verified,
    #[serde(rename = "DEBUNKED")]
    Debunked,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "skipped_db")]
    SkippedDb,
}

impl Status {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Researched => "researched",
            Status::Audited => "audited",
            Status::Verified => "VERIFIED",
            Status::Debunked => "DEBUNKED",
            Status::Error => "error",
            Status::SkippedDb => "skipped_db",
        }
    }

    /// Whether this status ends the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Verified | Status::Debunked | Status::Error | Status::SkippedDb
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Verified,
    Debunked,
}

impl Verdict {
    /// The only verdict derivation: a found contradiction debunks the claim.
    pub fn from_contradiction(contradiction_found: bool) -> Self {
        if contradiction_found {
            Verdict::Debunked
        } else {
            Verdict::Verified
        }
    }

    /// Status written when the verdict is recorded.
    pub fn status(&self) -> Status {
        match self {
            Verdict::Verified => Status::Verified,
            Verdict::Debunked => Status::Debunked,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated state for one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimVerificationState {
    /// The statement being checked (immutable once created)
    claim: String,

    /// Judgment produced by the research stage
    pub hypothesis: String,

    /// Source URLs in the search provider's relevance order
    pub sources: Vec<String>,

    /// Research confidence, 0-100
    pub confidence: u8,

    /// Outcome of the adversarial audit
    pub contradiction_found: bool,

    /// Audit rationale
    pub evidence: String,

    /// How thoroughly the audit disproved the hypothesis, 0-100
    pub kill_score: u8,

    /// Lifecycle position
    pub status: Status,
}

impl ClaimVerificationState {
    /// Create the initial state for a claim.
    ///
    /// The claim is trimmed; an empty claim is rejected.
    pub fn new(claim: impl Into<String>) -> Result<Self, StateError> {
        let claim = claim.into().trim().to_string();
        if claim.is_empty() {
            return Err(StateError::EmptyClaim);
        }

        Ok(Self {
            claim,
            hypothesis: defaults::DEFAULT_HYPOTHESIS.to_string(),
            sources: Vec::new(),
            confidence: defaults::DEFAULT_CONFIDENCE,
            contradiction_found: defaults::DEFAULT_CONTRADICTION_FOUND,
            evidence: defaults::DEFAULT_EVIDENCE.to_string(),
            kill_score: defaults::DEFAULT_KILL_SCORE,
            status: Status::New,
        })
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }

    /// Shallow-merge a stage's partial update into this state.
    ///
    /// Only the fields the update defines are overwritten.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            hypothesis,
            sources,
            confidence,
            contradiction_found,
            evidence,
            kill_score,
            status,
        } = update;

        if let Some(hypothesis) = hypothesis {
            self.hypothesis = hypothesis;
        }
        if let Some(sources) = sources {
            self.sources = sources;
        }
        if let Some(confidence) = confidence {
            self.confidence = confidence;
        }
        if let Some(contradiction_found) = contradiction_found {
            self.contradiction_found = contradiction_found;
        }
        if let Some(evidence) = evidence {
            self.evidence = evidence;
        }
        if let Some(kill_score) = kill_score {
            self.kill_score = kill_score;
        }
        if let Some(status) = status {
            self.status = status;
        }
    }

    /// Consume the state and return it with the update applied.
    pub fn merged(mut self, update: StateUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Verdict implied by the audit outcome.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_contradiction(self.contradiction_found)
    }
}

/// Partial update returned by a stage.
///
/// `None` leaves the accumulated field untouched. The claim itself is not
/// part of an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contradiction_found: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill_score: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl StateUpdate {
    /// Update produced by a successful research stage.
    pub fn researched(hypothesis: impl Into<String>, sources: Vec<String>, confidence: u8) -> Self {
        Self {
            hypothesis: Some(hypothesis.into()),
            sources: Some(sources),
            confidence: Some(confidence.min(defaults::MAX_SCORE)),
            status: Some(Status::Researched),
            ..Default::default()
        }
    }

    /// Update produced by a completed audit.
    pub fn audited(contradiction_found: bool, evidence: impl Into<String>, kill_score: u8) -> Self {
        Self {
            contradiction_found: Some(contradiction_found),
            evidence: Some(evidence.into()),
            kill_score: Some(kill_score.min(defaults::MAX_SCORE)),
            status: Some(Status::Audited),
            ..Default::default()
        }
    }

    /// Update carrying only a status.
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Catch-path update for a failed research stage.
    ///
    /// The failure is folded into the hypothesis so the operator sees it.
    pub fn research_failed(reason: impl fmt::Display) -> Self {
        Self::researched(
            format!("{}{}", defaults::RESEARCH_ERROR_PREFIX, reason),
            Vec::new(),
            defaults::DEFAULT_CONFIDENCE,
        )
    }

    /// Catch-path update for a failed audit.
    ///
    /// Fails open: the claim stands and nothing is debunked.
    pub fn audit_failed(reason: impl fmt::Display) -> Self {
        Self::audited(
            defaults::DEFAULT_CONTRADICTION_FOUND,
            format!("{}{}", defaults::AUDIT_ERROR_PREFIX, reason),
            defaults::DEFAULT_KILL_SCORE,
        )
    }

    /// Whether the update defines no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
