//! `[circle]` section — deliberation loop parameters

use circle_application::{DeliberationParams, FailureMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deliberation protocol settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleSection {
    pub max_rounds: usize,
    pub min_viable_circle: usize,
    pub failure_mode: FailureMode,
    /// Per-participant call timeout, in seconds
    pub call_timeout_secs: u64,
    pub convergence_threshold: f64,
    pub convergence_rounds: usize,
    pub dissent_threshold: f64,
    pub chair_divergence: f64,
}

impl Default for CircleSection {
    fn default() -> Self {
        let params = DeliberationParams::default();
        Self {
            max_rounds: params.max_rounds,
            min_viable_circle: params.min_viable_circle,
            failure_mode: params.failure_mode,
            call_timeout_secs: params.call_timeout.as_secs(),
            convergence_threshold: params.convergence_threshold,
            convergence_rounds: params.convergence_rounds,
            dissent_threshold: params.dissent_threshold,
            chair_divergence: params.chair_divergence,
        }
    }
}

impl CircleSection {
    /// Map the section onto the application-layer parameters
    pub fn deliberation_params(&self) -> DeliberationParams {
        DeliberationParams {
            max_rounds: self.max_rounds,
            min_viable_circle: self.min_viable_circle,
            failure_mode: self.failure_mode,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
            convergence_threshold: self.convergence_threshold,
            convergence_rounds: self.convergence_rounds,
            dissent_threshold: self.dissent_threshold,
            chair_divergence: self.chair_divergence,
        }
    }
}
