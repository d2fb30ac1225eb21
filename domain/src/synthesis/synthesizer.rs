//! Synthesizer — post-processes completed rounds into patterns, dissents,
//! and the empty-chair influence signal.

use crate::circle::round::Round;
use crate::synthesis::dissent::{Dissent, extract_dissents};
use crate::synthesis::pattern::{LexicalPatternExtractor, PatternExtractor, PatternObservation};
use serde::{Deserialize, Serialize};

/// Thresholds for the synthesis pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Pairwise falsehood divergence above which a dissent is recorded
    pub dissent_threshold: f64,
    /// Divergence from the round mean above which the empty chair counts
    /// as having moved the discussion
    pub chair_divergence: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            dissent_threshold: 0.3,
            chair_divergence: 0.2,
        }
    }
}

/// Output of the synthesis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub patterns: Vec<PatternObservation>,
    pub dissents: Vec<Dissent>,
    pub empty_chair_influence: f64,
}

/// Post-processor over an immutable, completed set of rounds
pub struct Synthesizer {
    config: SynthesisConfig,
    extractor: Box<dyn PatternExtractor>,
}

impl Synthesizer {
    /// Synthesizer with the default lexical pattern extractor
    pub fn new(config: SynthesisConfig) -> Self {
        Self {
            config,
            extractor: Box::new(LexicalPatternExtractor::new()),
        }
    }

    /// Swap in a different pattern extraction strategy
    pub fn with_extractor(mut self, extractor: Box<dyn PatternExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Run the full synthesis pass
    pub fn synthesize(&self, rounds: &[Round]) -> SynthesisOutput {
        SynthesisOutput {
            patterns: self.extractor.extract(rounds),
            dissents: extract_dissents(rounds, self.config.dissent_threshold),
            empty_chair_influence: self.empty_chair_influence(rounds),
        }
    }

    /// Fraction of rounds in which the empty chair's falsehood diverged
    /// from the mean of the other genuine evaluations by more than the
    /// configured margin. Rounds where the chair produced no genuine
    /// evaluation, or where it had nobody to diverge from, are skipped.
    fn empty_chair_influence(&self, rounds: &[Round]) -> f64 {
        let mut eligible = 0usize;
        let mut diverged = 0usize;

        for round in rounds {
            let Some(chair) = round.empty_chair_evaluation().filter(|e| e.is_genuine()) else {
                continue;
            };
            let others: Vec<f64> = round
                .genuine_evaluations()
                .filter(|e| e.model != round.empty_chair)
                .map(|e| e.falsehood)
                .collect();
            if others.is_empty() {
                continue;
            }
            eligible += 1;
            let mean = others.iter().sum::<f64>() / others.len() as f64;
            if (chair.falsehood - mean).abs() > self.config.chair_divergence {
                diverged += 1;
            }
        }

        if eligible == 0 {
            0.0
        } else {
            diverged as f64 / eligible as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::neutrosophic::NeutrosophicEvaluation;
    use std::collections::BTreeMap;

    fn round(n: usize, chair: &str, fs: &[(&str, f64)]) -> Round {
        let map: BTreeMap<_, _> = fs
            .iter()
            .map(|(m, f)| {
                (
                    m.to_string(),
                    NeutrosophicEvaluation::new(*m, 0.5, 0.1, *f, "reasoning"),
                )
            })
            .collect();
        Round::new(n, chair, map, BTreeMap::new())
    }

    #[test]
    fn test_synthesize_collects_all_outputs() {
        let rounds = vec![round(1, "a", &[("a", 0.9), ("b", 0.2), ("c", 0.3)])];
        let output = Synthesizer::new(SynthesisConfig::default()).synthesize(&rounds);
        assert_eq!(output.dissents.len(), 2);
        assert_eq!(output.empty_chair_influence, 1.0);
    }

    #[test]
    fn test_chair_in_agreement_has_no_influence() {
        let rounds = vec![
            round(1, "a", &[("a", 0.3), ("b", 0.3), ("c", 0.3)]),
            round(2, "b", &[("a", 0.4), ("b", 0.4), ("c", 0.4)]),
        ];
        let output = Synthesizer::new(SynthesisConfig::default()).synthesize(&rounds);
        assert_eq!(output.empty_chair_influence, 0.0);
    }

    #[test]
    fn test_chair_influence_is_a_fraction_of_rounds() {
        let rounds = vec![
            // chair far from the others' mean
            round(1, "a", &[("a", 0.9), ("b", 0.2), ("c", 0.2)]),
            // chair aligned
            round(2, "b", &[("a", 0.4), ("b", 0.4), ("c", 0.4)]),
        ];
        let output = Synthesizer::new(SynthesisConfig::default()).synthesize(&rounds);
        assert_eq!(output.empty_chair_influence, 0.5);
    }

    #[test]
    fn test_chair_missing_round_is_skipped() {
        // Chair "d" never produced an evaluation
        let rounds = vec![round(1, "d", &[("a", 0.2), ("b", 0.8)])];
        let output = Synthesizer::new(SynthesisConfig::default()).synthesize(&rounds);
        assert_eq!(output.empty_chair_influence, 0.0);
    }

    #[test]
    fn test_solo_chair_round_is_skipped() {
        let rounds = vec![round(1, "a", &[("a", 0.9)])];
        let output = Synthesizer::new(SynthesisConfig::default()).synthesize(&rounds);
        assert_eq!(output.empty_chair_influence, 0.0);
    }

    #[test]
    fn test_custom_extractor() {
        struct FixedExtractor;
        impl PatternExtractor for FixedExtractor {
            fn extract(&self, _rounds: &[Round]) -> Vec<PatternObservation> {
                vec![PatternObservation {
                    name: "fixed".to_string(),
                    agreement_score: 1.0,
                }]
            }
        }

        let output = Synthesizer::new(SynthesisConfig::default())
            .with_extractor(Box::new(FixedExtractor))
            .synthesize(&[]);
        assert_eq!(output.patterns.len(), 1);
        assert_eq!(output.patterns[0].name, "fixed");
    }
}
