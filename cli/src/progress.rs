//! Console progress reporting for a running deliberation

use circle_application::{DeliberationProgress, EvaluationOutcomeKind};
use circle_domain::Model;
use colored::Colorize;

/// Prints one line per protocol event to stderr, keeping stdout clean
/// for the result itself.
pub struct ConsoleProgress;

impl DeliberationProgress for ConsoleProgress {
    fn on_round_start(&self, round: usize, live_participants: usize) {
        eprintln!(
            "{} round {} with {} participants",
            "▸".cyan(),
            round,
            live_participants
        );
    }

    fn on_evaluation_complete(&self, _round: usize, model: &Model, outcome: EvaluationOutcomeKind) {
        let status = match outcome {
            EvaluationOutcomeKind::Ok => "evaluated".green().to_string(),
            EvaluationOutcomeKind::ParseFailure => "unparseable (kept as data)".yellow().to_string(),
            EvaluationOutcomeKind::CallFailure => "call failed".red().to_string(),
        };
        eprintln!("    {model}: {status}");
    }

    fn on_round_complete(&self, round: usize, agreement: Option<f64>) {
        match agreement {
            Some(score) => eprintln!(
                "{} round {} closed, agreement {:.2}",
                "✓".green(),
                round,
                score
            ),
            None => eprintln!("{} round {} closed", "✓".green(), round),
        }
    }

    fn on_participant_zombified(&self, model: &Model, round: usize) {
        eprintln!(
            "{} {} excluded from further rounds (failed in round {})",
            "✗".red(),
            model,
            round
        );
    }
}
