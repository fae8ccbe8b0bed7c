//! Truth-graph write planning.
//!
//! The archive stage records each verdict as Claim, Source and Evidence nodes.
//! The statements are planned here, deterministically, so the graph store only
//! has to execute them inside one write transaction. Every statement uses
//! `MERGE` keyed by text or URL, so re-running a claim is idempotent.

use serde::{Deserialize, Serialize};

use crate::state::{ClaimVerificationState, Verdict};

/// Node colour for a debunked claim.
pub const DEBUNKED_COLOR: &str = "#ff0000";

/// Node colour for a verified claim.
pub const VERIFIED_COLOR: &str = "#00ff00";

/// Status a claim node carries while its transaction is in flight.
pub const VERIFYING_STATUS: &str = "VERIFYING";

const MERGE_CLAIM: &str = "MERGE (c:Claim {text: $claim}) SET c.status = $status";

const MERGE_SOURCE: &str = "MATCH (c:Claim {text: $claim}) \
     MERGE (s:Source {url: $url}) \
     MERGE (s)-[:SUPPORTS]->(c)";

const MARK_DEBUNKED: &str = "MATCH (c:Claim {text: $claim}) \
     SET c.status = $status, c.color = $color \
     MERGE (e:Evidence {text: $evidence}) \
     MERGE (e)-[:CONTRADICTS]->(c)";

const MARK_VERIFIED: &str = "MATCH (c:Claim {text: $claim}) \
     SET c.status = $status, c.color = $color";

/// A parameterised Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CypherStatement {
    pub text: String,
    pub params: Vec<(String, String)>,
}

impl CypherStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Bind a string parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Look up a bound parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The subset of verification state the archive records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub claim: String,
    pub sources: Vec<String>,
    pub contradiction_found: bool,
    pub evidence: String,
}

impl VerdictRecord {
    pub fn from_state(state: &ClaimVerificationState) -> Self {
        Self {
            claim: state.claim().to_string(),
            sources: state.sources.clone(),
            contradiction_found: state.contradiction_found,
            evidence: state.evidence.clone(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_contradiction(self.contradiction_found)
    }
}

/// Plan the write transaction for one verdict.
///
/// Order: claim upsert, one statement per source in relevance order, then
/// the verdict marker.
pub fn plan_truth_graph(record: &VerdictRecord) -> Vec<CypherStatement> {
    let mut plan = Vec::with_capacity(record.sources.len() + 2);

    plan.push(
        CypherStatement::new(MERGE_CLAIM)
            .param("claim", record.claim.as_str())
            .param("status", VERIFYING_STATUS),
    );

    for url in &record.sources {
        plan.push(
            CypherStatement::new(MERGE_SOURCE)
                .param("claim", record.claim.as_str())
                .param("url", url.as_str()),
        );
    }

    let verdict = record.verdict();
    let marker = match verdict {
        Verdict::Debunked => CypherStatement::new(MARK_DEBUNKED)
            .param("claim", record.claim.as_str())
            .param("status", verdict.as_str())
            .param("color", DEBUNKED_COLOR)
            .param("evidence", record.evidence.as_str()),
        Verdict::Verified => CypherStatement::new(MARK_VERIFIED)
            .param("claim", record.claim.as_str())
            .param("status", verdict.as_str())
            .param("color", VERIFIED_COLOR),
    };
    plan.push(marker);

    plan
}
