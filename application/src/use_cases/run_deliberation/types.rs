//! Input and error types for the deliberation use case

use crate::config::DeliberationParams;
use crate::ports::llm_gateway::GatewayError;
use circle_domain::{EvaluationTarget, Model, Round};
use thiserror::Error;

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    /// The text under evaluation
    pub target: EvaluationTarget,
    /// Circle composition
    pub participants: Vec<Model>,
    /// Loop control parameters
    pub params: DeliberationParams,
}

impl RunDeliberationInput {
    pub fn new(target: EvaluationTarget, participants: Vec<Model>) -> Self {
        Self {
            target,
            participants,
            params: DeliberationParams::default(),
        }
    }

    pub fn with_params(mut self, params: DeliberationParams) -> Self {
        self.params = params;
        self
    }
}

/// Errors that can terminate a deliberation
///
/// Terminal errors still carry the rounds completed before the failure —
/// partial transcripts are returned, never silently discarded.
#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error("No participants configured")]
    NoParticipants,

    #[error("Invalid deliberation parameters: {0}")]
    InvalidParams(String),

    #[error(
        "Quorum lost before round {round}: {live} live participants, {required} required"
    )]
    QuorumLost {
        round: usize,
        live: usize,
        required: usize,
        partial_rounds: Vec<Round>,
    },

    #[error("Participant {model} failed in round {round}: {source}")]
    ParticipantCallFailed {
        model: String,
        round: usize,
        #[source]
        source: GatewayError,
        partial_rounds: Vec<Round>,
    },

    #[error("Participant {model} returned an unparseable evaluation in round {round}: {cause}")]
    ParticipantParseFailed {
        model: String,
        round: usize,
        cause: String,
        partial_rounds: Vec<Round>,
    },

    #[error("Every participant failed before producing an evaluation")]
    AllParticipantsFailed,
}

impl DeliberationError {
    /// Rounds completed before the error, when the error carries any
    pub fn partial_rounds(&self) -> &[Round] {
        match self {
            DeliberationError::QuorumLost { partial_rounds, .. }
            | DeliberationError::ParticipantCallFailed { partial_rounds, .. }
            | DeliberationError::ParticipantParseFailed { partial_rounds, .. } => partial_rounds,
            _ => &[],
        }
    }
}
