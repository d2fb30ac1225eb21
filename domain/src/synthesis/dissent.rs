//! Dissent extraction — pairwise falsehood divergences worth preserving
//!
//! A dissent is recorded whenever two participants' falsehood judgments
//! in the same round diverge beyond a threshold, regardless of which side
//! the final consensus favored. A minority judgment considered wrong
//! today can be revisited later with it still on record.

use crate::circle::round::Round;
use serde::{Deserialize, Serialize};

/// A recorded pairwise disagreement between two participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dissent {
    /// Round in which the divergence occurred
    pub round_number: usize,
    /// Participant with the higher falsehood judgment
    pub model_high: String,
    /// Participant with the lower falsehood judgment
    pub model_low: String,
    /// Absolute falsehood difference
    pub f_delta: f64,
    /// Reasoning of the high-falsehood participant
    pub reasoning_high: String,
    /// Reasoning of the low-falsehood participant
    pub reasoning_low: String,
}

/// Extract all dissents above `threshold` from the completed rounds.
///
/// Only genuine evaluations participate — a parse-failure stand-in holds
/// no position to dissent from. Within a round, pairs are walked in
/// participant-id order, so output is deterministic.
pub fn extract_dissents(rounds: &[Round], threshold: f64) -> Vec<Dissent> {
    let mut dissents = Vec::new();

    for round in rounds {
        let genuine: Vec<_> = round.genuine_evaluations().collect();
        for (i, a) in genuine.iter().enumerate() {
            for b in &genuine[i + 1..] {
                let f_delta = (a.falsehood - b.falsehood).abs();
                if f_delta <= threshold {
                    continue;
                }
                let (high, low) = if a.falsehood >= b.falsehood {
                    (a, b)
                } else {
                    (b, a)
                };
                dissents.push(Dissent {
                    round_number: round.round_number,
                    model_high: high.model.clone(),
                    model_low: low.model.clone(),
                    f_delta,
                    reasoning_high: high.reasoning.clone(),
                    reasoning_low: low.reasoning.clone(),
                });
            }
        }
    }

    dissents
}
