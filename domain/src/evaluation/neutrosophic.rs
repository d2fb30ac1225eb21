//! Neutrosophic evaluation — the unit judgment of a Fire Circle
//!
//! A neutrosophic evaluation expresses a judgment as three independent
//! axes (truth, indeterminacy, falsehood) rather than a single score.
//! The triple deliberately does NOT sum to 1: it is not a probability
//! distribution, and each axis is bounded to `[0, 1]` on its own.

use serde::{Deserialize, Serialize};

/// Prefix marking an evaluation that stands in for an unparseable response
pub const PARSE_ERROR_MARKER: &str = "PARSE_ERROR";

/// A single judgment from one participant in one round
///
/// # Example
///
/// ```
/// use circle_domain::NeutrosophicEvaluation;
///
/// let eval = NeutrosophicEvaluation::new(
///     "claude-sonnet-4.5",
///     0.2,
///     0.1,
///     0.8,
///     "The prompt fabricates a prior agreement to extract compliance.",
/// );
/// assert_eq!(eval.falsehood, 0.8);
/// assert!(!eval.is_parse_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutrosophicEvaluation {
    /// Degree to which the text appears honest/consistent (0.0 to 1.0)
    pub truth: f64,
    /// Degree of uncertainty in the judgment (0.0 to 1.0)
    pub indeterminacy: f64,
    /// Degree of detected manipulation/deception (0.0 to 1.0)
    pub falsehood: f64,
    /// Free-text justification from the participant
    pub reasoning: String,
    /// Participant identifier (e.g., "claude-sonnet-4.5")
    pub model: String,
    /// Raw model output, kept when the structured parse failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_trace: Option<String>,
}

impl NeutrosophicEvaluation {
    /// Create an evaluation, clamping each axis to `[0, 1]`
    pub fn new(
        model: impl Into<String>,
        truth: f64,
        indeterminacy: f64,
        falsehood: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            truth: truth.clamp(0.0, 1.0),
            indeterminacy: indeterminacy.clamp(0.0, 1.0),
            falsehood: falsehood.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
            model: model.into(),
            reasoning_trace: None,
        }
    }

    /// Create the stand-in evaluation for an unparseable response
    ///
    /// Maximum indeterminacy, neutral truth/falsehood: the failed parse
    /// lowers confidence in the round without pulling the verdict in
    /// either direction. The raw text is preserved for audit.
    pub fn parse_error(
        model: impl Into<String>,
        cause: impl std::fmt::Display,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            truth: 0.5,
            indeterminacy: 1.0,
            falsehood: 0.5,
            reasoning: format!("{PARSE_ERROR_MARKER}: {cause}"),
            model: model.into(),
            reasoning_trace: Some(raw_text.into()),
        }
    }

    /// Whether this evaluation stands in for a failed parse
    pub fn is_parse_error(&self) -> bool {
        self.reasoning.starts_with(PARSE_ERROR_MARKER)
    }

    /// Whether this is a genuine judgment (not a parse-failure stand-in)
    pub fn is_genuine(&self) -> bool {
        !self.is_parse_error()
    }
}

/// Worst-case aggregation over a set of evaluations
///
/// `min(truth)`, `max(indeterminacy)`, `max(falsehood)`: a single strong
/// falsehood signal anywhere in the input set is never averaged away.
/// This is the security-first merge used both per round and across the
/// whole deliberation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    pub truth: f64,
    pub indeterminacy: f64,
    pub falsehood: f64,
}

impl Consensus {
    /// Merge evaluations worst-case; `None` for an empty set
    pub fn worst_case<'a, I>(evaluations: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NeutrosophicEvaluation>,
    {
        let mut merged: Option<Self> = None;
        for eval in evaluations {
            merged = Some(match merged {
                None => Self {
                    truth: eval.truth,
                    indeterminacy: eval.indeterminacy,
                    falsehood: eval.falsehood,
                },
                Some(acc) => Self {
                    truth: acc.truth.min(eval.truth),
                    indeterminacy: acc.indeterminacy.max(eval.indeterminacy),
                    falsehood: acc.falsehood.max(eval.falsehood),
                },
            });
        }
        merged
    }
}

impl std::fmt::Display for Consensus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T={:.2} I={:.2} F={:.2}",
            self.truth, self.indeterminacy, self.falsehood
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(model: &str, t: f64, i: f64, f: f64) -> NeutrosophicEvaluation {
        NeutrosophicEvaluation::new(model, t, i, f, "reasoning")
    }

    #[test]
    fn test_new_clamps_axes() {
        let e = NeutrosophicEvaluation::new("m", 1.5, -0.2, 0.7, "r");
        assert_eq!(e.truth, 1.0);
        assert_eq!(e.indeterminacy, 0.0);
        assert_eq!(e.falsehood, 0.7);
    }

    #[test]
    fn test_triple_need_not_sum_to_one() {
        let e = eval("m", 0.9, 0.9, 0.9);
        assert!(e.truth + e.indeterminacy + e.falsehood > 1.0);
    }

    #[test]
    fn test_parse_error_shape() {
        let e = NeutrosophicEvaluation::parse_error("m", "no JSON object found", "garbage");
        assert_eq!(e.truth, 0.5);
        assert_eq!(e.indeterminacy, 1.0);
        assert_eq!(e.falsehood, 0.5);
        assert!(e.reasoning.starts_with("PARSE_ERROR: "));
        assert_eq!(e.reasoning_trace.as_deref(), Some("garbage"));
        assert!(e.is_parse_error());
        assert!(!e.is_genuine());
    }

    #[test]
    fn test_worst_case_merge() {
        let evals = vec![
            eval("a", 0.8, 0.1, 0.2),
            eval("b", 0.3, 0.6, 0.9),
            eval("c", 0.5, 0.2, 0.4),
        ];
        let consensus = Consensus::worst_case(&evals).unwrap();
        assert_eq!(consensus.truth, 0.3);
        assert_eq!(consensus.indeterminacy, 0.6);
        assert_eq!(consensus.falsehood, 0.9);
    }

    #[test]
    fn test_worst_case_empty_is_none() {
        assert!(Consensus::worst_case(&[]).is_none());
    }

    #[test]
    fn test_worst_case_single() {
        let evals = vec![eval("a", 0.7, 0.3, 0.1)];
        let consensus = Consensus::worst_case(&evals).unwrap();
        assert_eq!(consensus.truth, 0.7);
        assert_eq!(consensus.falsehood, 0.1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let e = NeutrosophicEvaluation::new("m", 0.2, 0.3, 0.8, "justification");
        let json = serde_json::to_string(&e).unwrap();
        let back: NeutrosophicEvaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
        // reasoning_trace is omitted when absent
        assert!(!json.contains("reasoning_trace"));
    }
}
