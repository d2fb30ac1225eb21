//! Domain layer for fire-circle
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Fire Circle
//!
//! A Fire Circle is a bounded, multi-round deliberation in which several
//! LLM participants independently judge a piece of text for manipulative
//! intent and are then exposed to each other's judgments:
//!
//! - **Neutrosophic evaluation**: each judgment is a triple of independent
//!   axes (truth, indeterminacy, falsehood), not a single score
//! - **Empty chair**: one participant per round is instructed to voice
//!   perspectives absent from the majority view; the role rotates
//! - **Worst-case consensus**: aggregation never dilutes a strong
//!   falsehood signal, regardless of which round produced it
//!
//! ## Dissent Preservation
//!
//! Pairwise disagreements above a threshold are extracted as first-class
//! records so that a minority judgment considered wrong today can be
//! revisited later with it still on file.

pub mod circle;
pub mod core;
pub mod evaluation;
pub mod prompt;
pub mod synthesis;

// Re-export commonly used types
pub use circle::{
    convergence::{ConvergencePolicy, ConvergenceTracker},
    result::FireCircleResult,
    roster::{CircleRoster, ParticipantState},
    round::Round,
};
pub use core::{error::DomainError, model::Model, target::EvaluationTarget};
pub use evaluation::{
    neutrosophic::{Consensus, NeutrosophicEvaluation, PARSE_ERROR_MARKER},
    parsing::{EvaluationFields, ParseFailure, evaluation_from_response, parse_evaluation},
};
pub use prompt::PromptTemplate;
pub use synthesis::{
    dissent::{Dissent, extract_dissents},
    pattern::{LexicalPatternExtractor, PatternExtractor, PatternObservation},
    synthesizer::{SynthesisConfig, SynthesisOutput, Synthesizer},
};
