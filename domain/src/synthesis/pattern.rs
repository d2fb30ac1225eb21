//! Pattern extraction from free-text reasoning.
//!
//! Turning reasoning prose into named, reusable observations is a
//! pluggable strategy: the shipped default is lexical marker matching,
//! but a model-assisted extractor can be swapped in without touching the
//! engine or storage contracts. Only the output shape (`name`,
//! `agreement_score`) is load-bearing.

use crate::circle::round::Round;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named observation with cross-participant agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternObservation {
    /// Stable pattern name (e.g., "instruction-override")
    pub name: String,
    /// Fraction of contributing participants whose reasoning exhibits
    /// the pattern (0.0 to 1.0)
    pub agreement_score: f64,
}

/// Strategy for pulling named patterns out of reasoning texts
pub trait PatternExtractor: Send + Sync {
    fn extract(&self, rounds: &[Round]) -> Vec<PatternObservation>;
}

/// One named pattern and the markers that indicate it
#[derive(Debug, Clone)]
struct PatternLexeme {
    name: &'static str,
    markers: &'static [&'static str],
}

/// Lexical extractor: case-insensitive marker matching over reasonings.
///
/// A participant contributes to a pattern when any of its genuine
/// reasonings, across all rounds, contains one of the pattern's markers.
/// Agreement is contributing participants over participants that
/// produced at least one genuine evaluation.
pub struct LexicalPatternExtractor {
    lexicon: Vec<PatternLexeme>,
}

impl Default for LexicalPatternExtractor {
    fn default() -> Self {
        Self {
            lexicon: vec![
                PatternLexeme {
                    name: "instruction-override",
                    markers: &["ignore previous", "override", "disregard", "jailbreak", "bypass"],
                },
                PatternLexeme {
                    name: "role-reversal",
                    markers: &["role reversal", "pretend to be", "act as", "roleplay", "persona"],
                },
                PatternLexeme {
                    name: "authority-claim",
                    markers: &["authority", "impersonat", "official", "administrator"],
                },
                PatternLexeme {
                    name: "urgency-pressure",
                    markers: &["urgen", "immediately", "time pressure", "or else"],
                },
                PatternLexeme {
                    name: "emotional-appeal",
                    markers: &["guilt", "emotional", "sympathy", "fear", "threat"],
                },
                PatternLexeme {
                    name: "false-premise",
                    markers: &["false premise", "fabricat", "misleading", "pretends that", "made-up"],
                },
            ],
        }
    }
}

impl LexicalPatternExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatternExtractor for LexicalPatternExtractor {
    fn extract(&self, rounds: &[Round]) -> Vec<PatternObservation> {
        // Participant -> concatenated lowercase reasoning across all rounds
        let contributors: BTreeSet<&str> = rounds
            .iter()
            .flat_map(|r| r.genuine_evaluations())
            .map(|e| e.model.as_str())
            .collect();
        if contributors.is_empty() {
            return Vec::new();
        }

        let reasoning_for = |model: &str| -> String {
            rounds
                .iter()
                .flat_map(|r| r.genuine_evaluations())
                .filter(|e| e.model == model)
                .map(|e| e.reasoning.to_lowercase())
                .collect::<Vec<_>>()
                .join("\n")
        };
        let corpora: Vec<String> = contributors.iter().map(|m| reasoning_for(m)).collect();

        let mut observations = Vec::new();
        for lexeme in &self.lexicon {
            let matching = corpora
                .iter()
                .filter(|text| lexeme.markers.iter().any(|m| text.contains(m)))
                .count();
            if matching == 0 {
                continue;
            }
            observations.push(PatternObservation {
                name: lexeme.name.to_string(),
                agreement_score: matching as f64 / contributors.len() as f64,
            });
        }

        observations.sort_by(|a, b| {
            b.agreement_score
                .partial_cmp(&a.agreement_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        observations
    }
}
