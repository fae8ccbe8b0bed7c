//! Final verdict summary.
//!
//! The report is derived from the terminal state and is the only place the
//! user-facing verdict is computed:
//! - `contradiction_found == true` → DEBUNKED
//! - otherwise → VERIFIED
//!
//! The terminal status is reported beside the verdict so an archive failure
//! (`error`) or a disabled archive (`skipped_db`) stays visible without
//! changing the verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ClaimVerificationState, Status, Verdict};

/// Human-facing summary of one verified claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub claim: String,
    pub verdict: Verdict,
    pub status: Status,
    pub hypothesis: String,
    pub confidence: u8,
    pub evidence: String,
    pub kill_score: u8,
    pub sources: Vec<String>,
    pub verified_at: DateTime<Utc>,
}

impl VerificationReport {
    /// Summarize a state, stamped with the current time.
    pub fn from_state(state: &ClaimVerificationState) -> Self {
        Self::from_state_at(state, Utc::now())
    }

    /// Summarize a state with an explicit timestamp.
    pub fn from_state_at(state: &ClaimVerificationState, verified_at: DateTime<Utc>) -> Self {
        Self {
            claim: state.claim().to_string(),
            verdict: state.verdict(),
            status: state.status,
            hypothesis: state.hypothesis.clone(),
            confidence: state.confidence,
            evidence: state.evidence.clone(),
            kill_score: state.kill_score,
            sources: state.sources.clone(),
            verified_at,
        }
    }

    pub fn is_debunked(&self) -> bool {
        self.verdict == Verdict::Debunked
    }

    /// Whether the verdict reached the truth graph.
    pub fn archived(&self) -> bool {
        matches!(self.status, Status::Verified | Status::Debunked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateUpdate;

    fn audited_state(contradiction_found: bool) -> ClaimVerificationState {
        ClaimVerificationState::new("Water boils at 100C at sea level")
            .unwrap()
            .merged(StateUpdate::researched(
                "Likely true",
                vec!["https://a.example".into()],
                90,
            ))
            .merged(StateUpdate::audited(contradiction_found, "None found", 10))
    }

    #[test]
    fn test_verdict_follows_contradiction() {
        let report = VerificationReport::from_state(&audited_state(false));
        assert_eq!(report.verdict, Verdict::Verified);
        assert!(!report.is_debunked());

        let report = VerificationReport::from_state(&audited_state(true));
        assert_eq!(report.verdict, Verdict::Debunked);
    }

    #[test]
    fn test_skipped_archive_keeps_verdict() {
        let state = audited_state(true).merged(StateUpdate::status(Status::SkippedDb));
        let report = VerificationReport::from_state(&state);
        assert_eq!(report.verdict, Verdict::Debunked);
        assert_eq!(report.status, Status::SkippedDb);
        assert!(!report.archived());
    }

    #[test]
    fn test_report_copies_scores_and_sources() {
        let at = Utc::now();
        let report = VerificationReport::from_state_at(&audited_state(false), at);
        assert_eq!(report.confidence, 90);
        assert_eq!(report.kill_score, 10);
        assert_eq!(report.sources, vec!["https://a.example"]);
        assert_eq!(report.verified_at, at);
    }

    #[test]
    fn test_report_serializes_wire_names() {
        let state = audited_state(false).merged(StateUpdate::status(Status::Verified));
        let json = serde_json::to_value(VerificationReport::from_state(&state)).unwrap();
        assert_eq!(json["verdict"], "VERIFIED");
        assert_eq!(json["status"], "VERIFIED");
        assert_eq!(json["confidence"], 90);
    }
}
