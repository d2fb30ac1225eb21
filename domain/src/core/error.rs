//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid evaluation target: {0}")]
    InvalidTarget(String),

    #[error("No evaluations to aggregate")]
    NoEvaluations,

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
}
