//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.
//! Implementations live in the presentation/CLI layer.

use circle_domain::Model;

/// How a single participant call resolved within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcomeKind {
    /// Parsed into a genuine evaluation
    Ok,
    /// Response obtained but unparseable; recorded as data
    ParseFailure,
    /// Call failed or timed out
    CallFailure,
}

/// Callback for progress updates during deliberation
pub trait DeliberationProgress: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, round: usize, live_participants: usize);

    /// Called when one participant's call resolves within a round
    fn on_evaluation_complete(&self, round: usize, model: &Model, outcome: EvaluationOutcomeKind);

    /// Called when a round completes, with its agreement score (if the
    /// round had enough comparable judgments to compute one)
    fn on_round_complete(&self, round: usize, agreement: Option<f64>);

    /// Called when a participant is demoted to zombie
    fn on_participant_zombified(&self, _model: &Model, _round: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_round_start(&self, _round: usize, _live_participants: usize) {}
    fn on_evaluation_complete(
        &self,
        _round: usize,
        _model: &Model,
        _outcome: EvaluationOutcomeKind,
    ) {
    }
    fn on_round_complete(&self, _round: usize, _agreement: Option<f64>) {}
}
