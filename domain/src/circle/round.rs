//! A single completed round of deliberation
//!
//! A [`Round`] is created once by the round coordinator after every live
//! participant has either answered or failed, and is immutable thereafter.

use crate::evaluation::neutrosophic::{Consensus, NeutrosophicEvaluation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One completed round of the Fire Circle
///
/// Evaluations are keyed by participant id; a parse-failure stand-in
/// evaluation sits in the map like any other. `BTreeMap` keeps iteration
/// order deterministic for serialization and pairwise dissent walks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round number (1-indexed)
    pub round_number: usize,
    /// Evaluations collected this round, keyed by participant id
    pub evaluations: BTreeMap<String, NeutrosophicEvaluation>,
    /// Participant holding the empty chair this round
    pub empty_chair: String,
    /// Worst-case merge over this round's evaluations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_consensus: Option<Consensus>,
    /// Wall-clock latency per participant call
    pub model_latencies: BTreeMap<String, Duration>,
}

impl Round {
    /// Seal a round from the collected evaluations and latencies
    pub fn new(
        round_number: usize,
        empty_chair: impl Into<String>,
        evaluations: BTreeMap<String, NeutrosophicEvaluation>,
        model_latencies: BTreeMap<String, Duration>,
    ) -> Self {
        let local_consensus = Consensus::worst_case(evaluations.values());
        Self {
            round_number,
            evaluations,
            empty_chair: empty_chair.into(),
            local_consensus,
            model_latencies,
        }
    }

    /// Genuine (non-parse-error) evaluations this round
    pub fn genuine_evaluations(&self) -> impl Iterator<Item = &NeutrosophicEvaluation> {
        self.evaluations.values().filter(|e| e.is_genuine())
    }

    /// Spread of falsehood values across genuine evaluations
    ///
    /// `None` with fewer than two genuine evaluations — a spread of one
    /// opinion is not agreement, it is absence of comparison.
    pub fn falsehood_spread(&self) -> Option<f64> {
        let mut values = self.genuine_evaluations().map(|e| e.falsehood);
        let first = values.next()?;
        let (mut min, mut max, mut count) = (first, first, 1usize);
        for f in values {
            min = min.min(f);
            max = max.max(f);
            count += 1;
        }
        (count >= 2).then_some(max - min)
    }

    /// Agreement score for this round: `1 - falsehood_spread`
    pub fn agreement_score(&self) -> Option<f64> {
        self.falsehood_spread().map(|spread| 1.0 - spread)
    }

    /// The empty chair's evaluation, if it produced one
    pub fn empty_chair_evaluation(&self) -> Option<&NeutrosophicEvaluation> {
        self.evaluations.get(&self.empty_chair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::neutrosophic::NeutrosophicEvaluation;

    fn round_with(fs: &[(&str, f64)]) -> Round {
        let evaluations = fs
            .iter()
            .map(|(m, f)| {
                (
                    m.to_string(),
                    NeutrosophicEvaluation::new(*m, 0.5, 0.1, *f, "r"),
                )
            })
            .collect();
        Round::new(1, fs[0].0, evaluations, BTreeMap::new())
    }

    #[test]
    fn test_local_consensus_is_worst_case() {
        let round = round_with(&[("a", 0.2), ("b", 0.9), ("c", 0.4)]);
        let consensus = round.local_consensus.unwrap();
        assert_eq!(consensus.falsehood, 0.9);
    }

    #[test]
    fn test_falsehood_spread() {
        let round = round_with(&[("a", 0.2), ("b", 0.9), ("c", 0.4)]);
        let spread = round.falsehood_spread().unwrap();
        assert!((spread - 0.7).abs() < 1e-9);
        let agreement = round.agreement_score().unwrap();
        assert!((agreement - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_spread_none_for_single_evaluation() {
        let round = round_with(&[("a", 0.2)]);
        assert!(round.falsehood_spread().is_none());
        assert!(round.agreement_score().is_none());
    }

    #[test]
    fn test_parse_errors_excluded_from_spread_but_not_consensus() {
        let mut evaluations = BTreeMap::new();
        evaluations.insert(
            "a".to_string(),
            NeutrosophicEvaluation::new("a", 0.5, 0.1, 0.3, "r"),
        );
        evaluations.insert(
            "b".to_string(),
            NeutrosophicEvaluation::new("b", 0.5, 0.1, 0.35, "r"),
        );
        evaluations.insert(
            "c".to_string(),
            NeutrosophicEvaluation::parse_error("c", "bad", "raw"),
        );
        let round = Round::new(2, "a", evaluations, BTreeMap::new());

        // Spread considers only the two genuine judgments
        assert!((round.falsehood_spread().unwrap() - 0.05).abs() < 1e-9);
        // Consensus still absorbs the stand-in's indeterminacy
        assert_eq!(round.local_consensus.unwrap().indeterminacy, 1.0);
    }

    #[test]
    fn test_empty_round_has_no_consensus() {
        let round = Round::new(3, "a", BTreeMap::new(), BTreeMap::new());
        assert!(round.local_consensus.is_none());
        assert!(round.evaluations.is_empty());
    }

    #[test]
    fn test_empty_chair_evaluation_lookup() {
        let round = round_with(&[("a", 0.2), ("b", 0.4)]);
        assert_eq!(round.empty_chair, "a");
        assert_eq!(round.empty_chair_evaluation().unwrap().falsehood, 0.2);
    }
}
