//! Final deliberation artifact
//!
//! [`FireCircleResult`] is constructed once at the end of a deliberation
//! and never mutated. Callers that keep a reference after the result has
//! been stored must not assume it tracks storage's canonical copy.

use crate::circle::round::Round;
use crate::evaluation::neutrosophic::{Consensus, NeutrosophicEvaluation};
use crate::synthesis::dissent::Dissent;
use crate::synthesis::pattern::PatternObservation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete result of one Fire Circle deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireCircleResult {
    /// Unique id of this deliberation
    pub fire_circle_id: String,
    /// When the deliberation started
    pub started_at: DateTime<Utc>,
    /// Every configured participant, live or not by the end
    pub participants: Vec<String>,
    /// All completed rounds, in order
    pub rounds: Vec<Round>,
    /// Worst-case merge over every evaluation of every round
    pub consensus: Consensus,
    /// Named pattern observations across all reasoning texts
    pub patterns: Vec<PatternObservation>,
    /// Pairwise falsehood divergences worth preserving
    pub dissents: Vec<Dissent>,
    /// How often the empty chair diverged from the round majority
    pub empty_chair_influence: f64,
    /// Whether the live count never dropped below the minimum viable circle
    pub quorum_valid: bool,
    /// Total wall-clock duration
    pub duration: Duration,
}

impl FireCircleResult {
    /// Every evaluation from every round, in round order
    pub fn all_evaluations(&self) -> impl Iterator<Item = &NeutrosophicEvaluation> {
        self.rounds.iter().flat_map(|r| r.evaluations.values())
    }

    /// Number of completed rounds
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Largest pairwise falsehood divergence on record
    pub fn max_dissent_delta(&self) -> Option<f64> {
        self.dissents
            .iter()
            .map(|d| d.f_delta)
            .fold(None, |acc, d| Some(acc.map_or(d, |a: f64| a.max(d))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn eval(model: &str, f: f64) -> NeutrosophicEvaluation {
        NeutrosophicEvaluation::new(model, 0.5, 0.1, f, "r")
    }

    fn result_with_rounds(rounds: Vec<Round>) -> FireCircleResult {
        let consensus = Consensus::worst_case(
            rounds.iter().flat_map(|r| r.evaluations.values()),
        )
        .unwrap();
        FireCircleResult {
            fire_circle_id: "fc-test".to_string(),
            started_at: Utc::now(),
            participants: vec!["a".to_string(), "b".to_string()],
            rounds,
            consensus,
            patterns: vec![],
            dissents: vec![],
            empty_chair_influence: 0.0,
            quorum_valid: true,
            duration: Duration::from_secs(1),
        }
    }

    fn round(n: usize, fs: &[(&str, f64)]) -> Round {
        let evaluations: BTreeMap<_, _> = fs
            .iter()
            .map(|(m, f)| (m.to_string(), eval(m, *f)))
            .collect();
        Round::new(n, fs[0].0, evaluations, BTreeMap::new())
    }

    #[test]
    fn test_all_evaluations_spans_rounds() {
        let result = result_with_rounds(vec![
            round(1, &[("a", 0.9), ("b", 0.2)]),
            round(2, &[("a", 0.3), ("b", 0.25)]),
        ]);
        assert_eq!(result.all_evaluations().count(), 4);
        assert_eq!(result.round_count(), 2);
    }

    #[test]
    fn test_consensus_never_below_any_round_max() {
        let result = result_with_rounds(vec![
            round(1, &[("a", 0.9), ("b", 0.2)]),
            round(2, &[("a", 0.3), ("b", 0.25)]),
        ]);
        // The early 0.9 spike survives the calmer second round
        assert_eq!(result.consensus.falsehood, 0.9);
        for r in &result.rounds {
            assert!(result.consensus.falsehood >= r.local_consensus.unwrap().falsehood);
        }
    }

    #[test]
    fn test_max_dissent_delta() {
        let mut result = result_with_rounds(vec![round(1, &[("a", 0.9), ("b", 0.2)])]);
        assert!(result.max_dissent_delta().is_none());
        result.dissents.push(Dissent {
            round_number: 1,
            model_high: "a".to_string(),
            model_low: "b".to_string(),
            f_delta: 0.7,
            reasoning_high: "x".to_string(),
            reasoning_low: "y".to_string(),
        });
        assert_eq!(result.max_dissent_delta(), Some(0.7));
    }

    #[test]
    fn test_serde_roundtrip() {
        let result = result_with_rounds(vec![round(1, &[("a", 0.9), ("b", 0.2)])]);
        let json = serde_json::to_string(&result).unwrap();
        let back: FireCircleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
