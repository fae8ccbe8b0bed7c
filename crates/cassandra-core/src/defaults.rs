//! Fail-open defaults shared by every stage's catch path.
//!
//! All fallbacks lean toward "the claim stands". Nothing in this module may
//! default toward DEBUNKED.

/// Hypothesis used when the model reply carries none.
pub const DEFAULT_HYPOTHESIS: &str = "Analysis failed";

/// Audit evidence used when the model reply carries none.
pub const DEFAULT_EVIDENCE: &str = "No evidence provided.";

pub const DEFAULT_CONFIDENCE: u8 = 0;

pub const DEFAULT_KILL_SCORE: u8 = 0;

pub const DEFAULT_CONTRADICTION_FOUND: bool = false;

/// Prefix of the hypothesis when research fails.
pub const RESEARCH_ERROR_PREFIX: &str = "Error during research: ";

/// Prefix of the evidence when the audit fails.
pub const AUDIT_ERROR_PREFIX: &str = "Error during audit: ";

/// Most sources kept from one search.
pub const MAX_SOURCES: usize = 5;

/// Upper bound of confidence and kill score.
pub const MAX_SCORE: u8 = 100;
