//! Evaluation response parsing for Fire Circle rounds.
//!
//! These functions extract a structured neutrosophic judgment from
//! free-form LLM output. They are pure domain logic — no I/O, no session
//! management, just text extraction and strict field validation.
//!
//! Parsing never raises: [`parse_evaluation`] returns [`ParseFailure`] as
//! a value, and [`evaluation_from_response`] converts that value into a
//! maximum-indeterminacy stand-in evaluation so a bad parse weakens
//! confidence instead of crashing a round.
//!
//! Tolerated response shapes, tried in order:
//!
//! 1. A fenced code block (```json ... ```) with prose around it
//! 2. A bare JSON object, possibly followed by trailing explanation
//! 3. A doubled-brace object (`{{...}}`), a common template artifact

use crate::evaluation::neutrosophic::NeutrosophicEvaluation;
use serde::Deserialize;

/// The four structured fields expected from a participant
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationFields {
    pub truth: f64,
    pub indeterminacy: f64,
    pub falsehood: f64,
    pub reasoning: String,
}

/// A failed parse, reported as data rather than thrown
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// What went wrong (e.g., "missing field `truth`")
    pub cause: String,
    /// The unmodified model output, preserved for audit
    pub raw_text: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cause)
    }
}

/// Parse a raw model response into evaluation fields.
///
/// Total function: every input produces either fields or a
/// [`ParseFailure`] value. Out-of-range or non-finite numeric fields are
/// a failure, never silently defaulted.
pub fn parse_evaluation(raw: &str) -> Result<EvaluationFields, ParseFailure> {
    let failure = |cause: String| ParseFailure {
        cause,
        raw_text: raw.to_string(),
    };

    let candidate = extract_fenced_block(raw)
        .or_else(|| extract_balanced_object(raw))
        .ok_or_else(|| failure("no JSON object found in response".to_string()))?;

    let candidate = normalize_doubled_braces(candidate);

    let fields: EvaluationFields =
        serde_json::from_str(candidate).map_err(|e| failure(e.to_string()))?;

    for (name, value) in [
        ("truth", fields.truth),
        ("indeterminacy", fields.indeterminacy),
        ("falsehood", fields.falsehood),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(failure(format!(
                "field `{name}` out of range: {value}"
            )));
        }
    }

    Ok(fields)
}

/// Parse a raw response into an evaluation, absorbing failure as data.
///
/// On success the fields become a genuine evaluation for `model`; on
/// failure the result is the parse-error stand-in (indeterminacy 1.0,
/// `PARSE_ERROR` reasoning, raw text kept in `reasoning_trace`).
pub fn evaluation_from_response(model: impl Into<String>, raw: &str) -> NeutrosophicEvaluation {
    match parse_evaluation(raw) {
        Ok(fields) => NeutrosophicEvaluation::new(
            model,
            fields.truth,
            fields.indeterminacy,
            fields.falsehood,
            fields.reasoning,
        ),
        Err(fail) => NeutrosophicEvaluation::parse_error(model, &fail.cause, fail.raw_text),
    }
}

/// Extract the span between the first code fence and its closing fence.
///
/// The opening fence may carry a language tag (```json); everything on
/// the fence line is skipped. Returns `None` when no complete fenced
/// block exists.
fn extract_fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let after_fence = &raw[open + 3..];
    // Skip the language tag up to end of the fence line
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Extract the first top-level JSON object via brace-depth scanning.
///
/// Braces inside string literals are ignored (escape sequences honored),
/// and anything after the matching close brace — models like to append
/// explanatory prose — is discarded. Returns `None` when no balanced
/// object exists.
fn extract_balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalize a doubled leading/trailing brace (`{{...}}` -> `{...}`).
fn normalize_doubled_braces(candidate: &str) -> &str {
    let trimmed = candidate.trim();
    if trimmed.starts_with("{{") && trimmed.ends_with("}}") && trimmed.len() >= 4 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str =
        r#"{"truth": 0.3, "indeterminacy": 0.1, "falsehood": 0.8, "reasoning": "Urgency pressure"}"#;

    #[test]
    fn test_parse_clean_json() {
        let fields = parse_evaluation(CLEAN).unwrap();
        assert_eq!(fields.truth, 0.3);
        assert_eq!(fields.falsehood, 0.8);
        assert_eq!(fields.reasoning, "Urgency pressure");
    }

    #[test]
    fn test_parse_fenced_block_with_prose() {
        let raw = format!("Here is my evaluation:\n```json\n{CLEAN}\n```\nLet me know!");
        let fields = parse_evaluation(&raw).unwrap();
        assert_eq!(fields.falsehood, 0.8);
    }

    #[test]
    fn test_parse_untagged_fence() {
        let raw = format!("```\n{CLEAN}\n```");
        assert!(parse_evaluation(&raw).is_ok());
    }

    #[test]
    fn test_parse_trailing_prose_after_object() {
        let raw = format!("{CLEAN}\n\nI chose 0.8 because the tone is coercive.");
        let fields = parse_evaluation(&raw).unwrap();
        assert_eq!(fields.falsehood, 0.8);
    }

    #[test]
    fn test_parse_leading_prose_before_object() {
        let raw = format!("My judgment follows. {CLEAN}");
        assert!(parse_evaluation(&raw).is_ok());
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let raw = r#"{"truth": 0.5, "indeterminacy": 0.2, "falsehood": 0.1, "reasoning": "uses {braces} and \"quotes\" freely"}"#;
        let fields = parse_evaluation(raw).unwrap();
        assert!(fields.reasoning.contains("{braces}"));
    }

    #[test]
    fn test_doubled_braces_normalized() {
        let raw = r#"{{"truth": 0.4, "indeterminacy": 0.2, "falsehood": 0.6, "reasoning": "templated"}}"#;
        let fields = parse_evaluation(raw).unwrap();
        assert_eq!(fields.falsehood, 0.6);

        let fenced = format!("```json\n{raw}\n```");
        let fields = parse_evaluation(&fenced).unwrap();
        assert_eq!(fields.falsehood, 0.6);
    }

    #[test]
    fn test_missing_field_fails() {
        let raw = r#"{"truth": 0.3, "falsehood": 0.8, "reasoning": "no indeterminacy"}"#;
        let fail = parse_evaluation(raw).unwrap_err();
        assert!(fail.cause.contains("indeterminacy"));
        assert_eq!(fail.raw_text, raw);
    }

    #[test]
    fn test_out_of_range_fails_not_defaults() {
        let raw = r#"{"truth": 0.3, "indeterminacy": 0.1, "falsehood": 1.8, "reasoning": "hot"}"#;
        let fail = parse_evaluation(raw).unwrap_err();
        assert!(fail.cause.contains("falsehood"));
    }

    #[test]
    fn test_no_json_at_all_fails() {
        let fail = parse_evaluation("I refuse to answer in JSON.").unwrap_err();
        assert!(fail.cause.contains("no JSON object"));
    }

    #[test]
    fn test_unbalanced_object_fails() {
        let fail = parse_evaluation(r#"{"truth": 0.3, "indeterminacy""#).unwrap_err();
        assert!(fail.cause.contains("no JSON object"));
    }

    #[test]
    fn test_evaluation_from_response_success() {
        let eval = evaluation_from_response("claude-sonnet-4.5", CLEAN);
        assert!(eval.is_genuine());
        assert_eq!(eval.model, "claude-sonnet-4.5");
        assert_eq!(eval.falsehood, 0.8);
        assert!(eval.reasoning_trace.is_none());
    }

    #[test]
    fn test_evaluation_from_response_failure_is_data() {
        let eval = evaluation_from_response("gpt-5.2", "not json");
        assert!(eval.is_parse_error());
        assert_eq!(eval.indeterminacy, 1.0);
        assert_eq!(eval.truth, 0.5);
        assert_eq!(eval.falsehood, 0.5);
        assert_eq!(eval.reasoning_trace.as_deref(), Some("not json"));
    }

    #[test]
    fn test_extra_fields_tolerated() {
        let raw = r#"{"truth": 0.3, "indeterminacy": 0.1, "falsehood": 0.8, "reasoning": "ok", "confidence": 0.9}"#;
        assert!(parse_evaluation(raw).is_ok());
    }
}
