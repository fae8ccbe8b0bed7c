//! Tolerant JSON extraction from language-model replies.
//!
//! Model replies are not guaranteed to be pure JSON: they may wrap the object
//! in prose or markdown fences. Extraction makes two attempts:
//!
//! 1. the greedy `{ ... }` span of the reply (first `{` to last `}`,
//!    across newlines)
//! 2. the whole reply
//!
//! If neither yields a JSON object, the caller gets an empty mapping and the
//! typed decoders fall back to the documented defaults.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::defaults;

lazy_static! {
    /// Greedy object span; `(?s)` lets `.` cross newlines.
    static ref OBJECT_SPAN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// JSON object extracted from a reply.
pub type Mapping = Map<String, Value>;

/// Why a reply yielded no JSON object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Reply is empty")]
    Empty,

    #[error("No JSON object found in reply: {0}")]
    NoObject(String),

    #[error("Reply JSON is not an object")]
    NotAnObject,
}

/// Extract the first JSON object from a model reply.
pub fn extract_json(text: &str) -> Result<Mapping, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    // Attempt 1: greedy brace span, which can only parse as an object
    if let Some(span) = OBJECT_SPAN.find(text) {
        if let Ok(map) = serde_json::from_str::<Mapping>(span.as_str()) {
            return Ok(map);
        }
    }

    // Attempt 2: the whole reply
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExtractError::NotAnObject),
        Err(e) => Err(ExtractError::NoObject(e.to_string())),
    }
}

/// Extract a mapping, collapsing every failure into an empty one.
pub fn extract_mapping(text: &str) -> Mapping {
    extract_json(text).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Reply had no usable JSON, using defaults");
        Mapping::new()
    })
}

/// Decoded reply of the research stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisReply {
    pub hypothesis: String,
    pub confidence: u8,
}

impl HypothesisReply {
    /// Decode from an extracted mapping, defaulting missing or mistyped keys.
    pub fn from_mapping(map: &Mapping) -> Self {
        Self {
            hypothesis: string_field(map, "hypothesis")
                .unwrap_or_else(|| defaults::DEFAULT_HYPOTHESIS.to_string()),
            confidence: score_field(map, "confidence").unwrap_or(defaults::DEFAULT_CONFIDENCE),
        }
    }

    /// Extract and decode a raw reply in one step.
    pub fn parse(reply: &str) -> Self {
        Self::from_mapping(&extract_mapping(reply))
    }
}

impl Default for HypothesisReply {
    fn default() -> Self {
        Self::from_mapping(&Mapping::new())
    }
}

/// Decoded reply of the audit stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReply {
    pub contradiction_found: bool,
    pub evidence: String,
    pub kill_score: u8,
}

impl AuditReply {
    /// Decode from an extracted mapping, defaulting missing or mistyped keys.
    pub fn from_mapping(map: &Mapping) -> Self {
        Self {
            contradiction_found: bool_field(map, "contradiction_found")
                .unwrap_or(defaults::DEFAULT_CONTRADICTION_FOUND),
            evidence: string_field(map, "evidence")
                .unwrap_or_else(|| defaults::DEFAULT_EVIDENCE.to_string()),
            kill_score: score_field(map, "kill_score").unwrap_or(defaults::DEFAULT_KILL_SCORE),
        }
    }

    /// Extract and decode a raw reply in one step.
    pub fn parse(reply: &str) -> Self {
        Self::from_mapping(&extract_mapping(reply))
    }
}

impl Default for AuditReply {
    fn default() -> Self {
        Self::from_mapping(&Mapping::new())
    }
}

fn string_field(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read a 0-100 score from an integer, a float or a numeric string.
fn score_field(map: &Mapping, key: &str) -> Option<u8> {
    let raw = match map.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, f64::from(defaults::MAX_SCORE)) as u8)
}

fn bool_field(map: &Mapping, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_pure_json() {
        let map = extract_json(r#"{"hypothesis": "False", "confidence": 85}"#).unwrap();
        assert_eq!(map.get("confidence"), Some(&json!(85)));
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let reply = "Sure! Here is my analysis:\n{\n  \"hypothesis\": \"False\",\n  \"confidence\": 85\n}\nLet me know.";
        let map = extract_json(reply).unwrap();
        assert_eq!(map.get("hypothesis"), Some(&json!("False")));
    }

    #[test]
    fn test_json_in_markdown_fence() {
        let reply = "```json\n{\"contradiction_found\": true, \"evidence\": \"x\", \"kill_score\": 90}\n```";
        let audit = AuditReply::parse(reply);
        assert!(audit.contradiction_found);
        assert_eq!(audit.kill_score, 90);
        assert_eq!(audit.evidence, "x");
    }

    #[test]
    fn test_no_json_yields_empty_mapping() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(ExtractError::NoObject(_))
        ));
        assert!(extract_mapping("I cannot help with that.").is_empty());
        assert_eq!(extract_json("   "), Err(ExtractError::Empty));
    }

    #[test]
    fn test_broken_span_falls_back_to_whole_reply() {
        // The greedy span `{oops} ... }` is invalid; the whole reply is too.
        let reply = "{oops} and then }";
        assert!(extract_json(reply).is_err());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert_eq!(extract_json("[1, 2, 3]"), Err(ExtractError::NotAnObject));
        assert_eq!(extract_json("42"), Err(ExtractError::NotAnObject));
    }

    #[test]
    fn test_brace_span_wins_over_outer_json() {
        let map = extract_json(r#"[{"confidence": 5}]"#).unwrap();
        assert_eq!(map["confidence"], 5);

        assert!(matches!(extract_json("{not json}"), Err(ExtractError::NoObject(_))));
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let hypothesis = HypothesisReply::parse("nothing useful");
        assert_eq!(hypothesis.hypothesis, "Analysis failed");
        assert_eq!(hypothesis.confidence, 0);

        let audit = AuditReply::parse("nothing useful");
        assert!(!audit.contradiction_found);
        assert_eq!(audit.evidence, "No evidence provided.");
        assert_eq!(audit.kill_score, 0);
    }

    #[test]
    fn test_missing_keys_default_individually() {
        let hypothesis = HypothesisReply::parse(r#"{"confidence": 40}"#);
        assert_eq!(hypothesis.hypothesis, "Analysis failed");
        assert_eq!(hypothesis.confidence, 40);

        let audit = AuditReply::parse(r#"{"kill_score": 75}"#);
        assert!(!audit.contradiction_found);
        assert_eq!(audit.kill_score, 75);
    }

    #[test]
    fn test_score_coercion() {
        assert_eq!(HypothesisReply::parse(r#"{"confidence": 72.6}"#).confidence, 73);
        assert_eq!(HypothesisReply::parse(r#"{"confidence": "64"}"#).confidence, 64);
        assert_eq!(HypothesisReply::parse(r#"{"confidence": "90%"}"#).confidence, 90);
        assert_eq!(HypothesisReply::parse(r#"{"confidence": 180}"#).confidence, 100);
        assert_eq!(HypothesisReply::parse(r#"{"confidence": -5}"#).confidence, 0);
        assert_eq!(HypothesisReply::parse(r#"{"confidence": "high"}"#).confidence, 0);
        assert_eq!(HypothesisReply::parse(r#"{"confidence": null}"#).confidence, 0);
    }

    #[test]
    fn test_bool_coercion() {
        assert!(AuditReply::parse(r#"{"contradiction_found": "TRUE"}"#).contradiction_found);
        assert!(!AuditReply::parse(r#"{"contradiction_found": "maybe"}"#).contradiction_found);
        assert!(!AuditReply::parse(r#"{"contradiction_found": 1}"#).contradiction_found);
    }

    #[test]
    fn test_moon_landing_reply() {
        let reply = r#"{"hypothesis":"Claim is false, evidence contradicts it","confidence":85}"#;
        let decoded = HypothesisReply::parse(reply);
        assert_eq!(decoded.hypothesis, "Claim is false, evidence contradicts it");
        assert_eq!(decoded.confidence, 85);
    }

    proptest! {
        #[test]
        fn prop_prose_around_json_is_ignored(
            prefix in "[a-zA-Z0-9 .,:!?\n]{0,40}",
            suffix in "[a-zA-Z0-9 .,:!?\n]{0,40}",
            hypothesis in "[a-zA-Z0-9 ]{0,30}",
            confidence in 0u8..=100,
        ) {
            let object = json!({"hypothesis": hypothesis, "confidence": confidence});
            let bare = object.to_string();
            let wrapped = format!("{prefix}{bare}{suffix}");

            prop_assert_eq!(extract_json(&wrapped).unwrap(), extract_json(&bare).unwrap());
        }

        #[test]
        fn prop_extraction_never_panics(text in "\\PC{0,200}") {
            let _ = extract_mapping(&text);
            let _ = HypothesisReply::parse(&text);
            let _ = AuditReply::parse(&text);
        }

        #[test]
        fn prop_scores_stay_in_range(value in proptest::num::f64::ANY) {
            let map: Mapping = serde_json::from_value(json!({"kill_score": value}))
                .unwrap_or_default();
            prop_assert!(AuditReply::from_mapping(&map).kill_score <= 100);
        }
    }
}
