//! Prompts for the research and audit stages.
//!
//! Each stage sends exactly one user-role message. The message ends with an
//! explicit JSON output directive naming the keys the stage decodes:
//! - Journalist: `hypothesis`, `confidence`
//! - Editor: `contradiction_found`, `evidence`, `kill_score`
//!
//! Replies are decoded tolerantly by `cassandra_core::extract`, so prose
//! around the JSON object is acceptable.

/// Output directive for the research stage.
pub const HYPOTHESIS_OUTPUT_FORMAT: &str =
    r#"Output format: JSON { "hypothesis": "string", "confidence": int }"#;

/// Output directive for the audit stage.
pub const AUDIT_OUTPUT_FORMAT: &str =
    r#"Output format: JSON { "contradiction_found": bool, "evidence": "string", "kill_score": int }"#;

/// Build the research instruction for a claim and its search context.
///
/// `context` may be empty when the search returned nothing.
pub fn journalist_prompt(claim: &str, context: &str) -> String {
    format!(
        r#"You are a Journalist. Analyze these search results about the claim: "{claim}".

Search Results:
{context}

Task:
1. Formulate a clear hypothesis about whether the claim is true or false based ONLY on these results.
2. Assign a confidence score (0-100).

{HYPOTHESIS_OUTPUT_FORMAT}"#
    )
}

/// Build the adversarial audit instruction.
pub fn editor_prompt(claim: &str, hypothesis: &str) -> String {
    format!(
        r#"You are a Skeptical Editor. Your job is to destroy this hypothesis.

Hypothesis: "{hypothesis}"
Claim: "{claim}"

Task:
1. Identify 3 specific "Kill Queries" that could disprove this (e.g. check weather, check exif, check location history).
2. Simulate the result of these checks based on common sense or the hypothesis itself (if it sounds fake).
3. Decide if there is a contradiction.
4. Assign a "Kill Score" (0-100), where 100 means definitely debunked.

{AUDIT_OUTPUT_FORMAT}"#
    )
}
