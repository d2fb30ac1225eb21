//! Deliberation parameters — protocol loop control.
//!
//! [`DeliberationParams`] groups the static parameters that control the
//! deliberation loop in
//! [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase).
//! Thresholds here are configuration, not protocol: the engine's
//! semantics do not change with their values.

use circle_domain::{ConvergencePolicy, SynthesisConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the engine treats per-participant failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Any call or parse failure aborts the whole deliberation
    Strict,
    /// Call failures demote the participant to zombie; parse failures
    /// are recorded as data
    #[default]
    Resilient,
}

/// Deliberation loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Upper bound on rounds
    pub max_rounds: usize,
    /// Minimum live participants required to continue (quorum)
    pub min_viable_circle: usize,
    /// Failure handling mode
    pub failure_mode: FailureMode,
    /// Independent timeout for each participant call
    pub call_timeout: Duration,
    /// Agreement score a round must reach to extend the convergence streak
    pub convergence_threshold: f64,
    /// Consecutive qualifying rounds required to halt early
    pub convergence_rounds: usize,
    /// Pairwise falsehood divergence above which a dissent is recorded
    pub dissent_threshold: f64,
    /// Empty-chair divergence margin for the influence signal
    pub chair_divergence: f64,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            min_viable_circle: 2,
            failure_mode: FailureMode::Resilient,
            call_timeout: Duration::from_secs(120),
            convergence_threshold: 0.85,
            convergence_rounds: 2,
            dissent_threshold: 0.3,
            chair_divergence: 0.2,
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_min_viable_circle(mut self, min: usize) -> Self {
        self.min_viable_circle = min;
        self
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_convergence(mut self, threshold: f64, rounds: usize) -> Self {
        self.convergence_threshold = threshold;
        self.convergence_rounds = rounds;
        self
    }

    pub fn with_dissent_threshold(mut self, threshold: f64) -> Self {
        self.dissent_threshold = threshold;
        self
    }

    // ==================== Derived Config ====================

    /// Convergence policy slice for the domain tracker
    pub fn convergence_policy(&self) -> ConvergencePolicy {
        ConvergencePolicy {
            threshold: self.convergence_threshold,
            required_rounds: self.convergence_rounds,
        }
    }

    /// Synthesis config slice for the domain synthesizer
    pub fn synthesis_config(&self) -> SynthesisConfig {
        SynthesisConfig {
            dissent_threshold: self.dissent_threshold,
            chair_divergence: self.chair_divergence,
        }
    }

    // ==================== Validation ====================

    /// Validate the parameter combination
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        if self.min_viable_circle == 0 {
            return Err("min_viable_circle must be at least 1".to_string());
        }
        if self.convergence_rounds == 0 {
            return Err("convergence_rounds must be at least 1".to_string());
        }
        for (name, value) in [
            ("convergence_threshold", self.convergence_threshold),
            ("dissent_threshold", self.dissent_threshold),
            ("chair_divergence", self.chair_divergence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        Ok(())
    }
}
