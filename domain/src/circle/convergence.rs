//! Convergence policy — when may a deliberation halt before max rounds
//!
//! The protocol halts early once per-round agreement has stayed above a
//! threshold for a configured number of consecutive rounds. Thresholds
//! are configuration, not protocol.

use serde::{Deserialize, Serialize};

/// Convergence thresholds for early halting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePolicy {
    /// Minimum agreement score a round must reach to extend the streak
    pub threshold: f64,
    /// Consecutive qualifying rounds required before halting
    pub required_rounds: usize,
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            required_rounds: 2,
        }
    }
}

/// Tracks the agreement streak across sequential rounds
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    policy: ConvergencePolicy,
    streak: usize,
}

impl ConvergenceTracker {
    pub fn new(policy: ConvergencePolicy) -> Self {
        Self { policy, streak: 0 }
    }

    /// Record a round's agreement score; returns whether the deliberation
    /// has converged.
    ///
    /// `None` (a round with fewer than two comparable judgments) carries
    /// no agreement information and resets the streak.
    pub fn observe(&mut self, agreement: Option<f64>) -> bool {
        match agreement {
            Some(score) if score >= self.policy.threshold => self.streak += 1,
            _ => self.streak = 0,
        }
        self.streak >= self.policy.required_rounds
    }

    /// Current streak length
    pub fn streak(&self) -> usize {
        self.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(threshold: f64, required: usize) -> ConvergenceTracker {
        ConvergenceTracker::new(ConvergencePolicy {
            threshold,
            required_rounds: required,
        })
    }

    #[test]
    fn test_converges_after_streak() {
        let mut t = tracker(0.8, 2);
        assert!(!t.observe(Some(0.9)));
        assert!(t.observe(Some(0.85)));
    }

    #[test]
    fn test_low_agreement_resets_streak() {
        let mut t = tracker(0.8, 2);
        assert!(!t.observe(Some(0.9)));
        assert!(!t.observe(Some(0.5)));
        assert!(!t.observe(Some(0.9)));
        assert!(t.observe(Some(0.9)));
    }

    #[test]
    fn test_missing_agreement_resets_streak() {
        let mut t = tracker(0.8, 2);
        assert!(!t.observe(Some(0.9)));
        assert!(!t.observe(None));
        assert_eq!(t.streak(), 0);
    }

    #[test]
    fn test_single_round_policy() {
        let mut t = tracker(0.8, 1);
        assert!(t.observe(Some(0.8)), "threshold is inclusive");
    }
}
