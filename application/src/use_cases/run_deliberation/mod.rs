//! Run Deliberation use case — the Fire Circle engine
//!
//! Drives the round coordinator across sequential rounds:
//! INIT → ROUND(1..k) → SYNTHESIS → DONE, with a QUORUM_LOST terminal
//! reachable before any round. Rounds are strictly sequential (round
//! k+1 prompts depend on round k's output); within a round all calls
//! run in parallel. The participant roster is the only mutable state
//! and is touched exclusively between rounds.

pub mod types;

mod round;

use crate::config::FailureMode;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{DeliberationProgress, NoProgress};
use circle_domain::{
    CircleRoster, Consensus, ConvergenceTracker, FireCircleResult, Round, Synthesizer,
};
use round::RoundCoordinator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use types::{DeliberationError, RunDeliberationInput};

/// Use case for running one Fire Circle deliberation
///
/// Each `execute` call is fully independent: no state is shared between
/// invocations, so concurrent deliberations are safe.
pub struct RunDeliberationUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: LlmGateway + 'static> RunDeliberationUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDeliberationInput,
    ) -> Result<FireCircleResult, DeliberationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDeliberationInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<FireCircleResult, DeliberationError> {
        input.params.validate().map_err(DeliberationError::InvalidParams)?;
        if input.participants.is_empty() {
            return Err(DeliberationError::NoParticipants);
        }

        let params = &input.params;
        let fire_circle_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now();
        let clock = Instant::now();

        info!(
            "Fire Circle {} convened: {} participants, max {} rounds",
            fire_circle_id,
            input.participants.len(),
            params.max_rounds
        );

        let mut roster = CircleRoster::new(input.participants.clone());
        let mut tracker = ConvergenceTracker::new(params.convergence_policy());
        let coordinator = RoundCoordinator::new(Arc::clone(&self.gateway), params.call_timeout);
        let mut rounds: Vec<Round> = Vec::new();

        for round_number in 1..=params.max_rounds {
            // Quorum check: the only transition into QUORUM_LOST
            let live_count = roster.live_count();
            if live_count < params.min_viable_circle {
                warn!(
                    "Fire Circle {}: quorum lost before round {} ({} live, {} required)",
                    fire_circle_id, round_number, live_count, params.min_viable_circle
                );
                return Err(DeliberationError::QuorumLost {
                    round: round_number,
                    live: live_count,
                    required: params.min_viable_circle,
                    partial_rounds: rounds,
                });
            }

            let empty_chair = roster
                .assign_empty_chair(round_number)
                .expect("live participants exist after quorum check");
            let live = roster.live();
            progress.on_round_start(round_number, live.len());
            debug!(
                "Round {}: {} live participants, empty chair {}",
                round_number,
                live.len(),
                empty_chair
            );

            let run = coordinator
                .run_round(
                    round_number,
                    &live,
                    &empty_chair,
                    &input.target,
                    &rounds,
                    progress,
                )
                .await;

            // Apply the failure mode between rounds, never mid-flight
            match params.failure_mode {
                FailureMode::Strict => {
                    if let Some((model, cause)) = run.parse_failures.into_iter().next() {
                        rounds.push(run.round);
                        return Err(DeliberationError::ParticipantParseFailed {
                            model: model.to_string(),
                            round: round_number,
                            cause,
                            partial_rounds: rounds,
                        });
                    }
                    if let Some((model, source)) = run.call_failures.into_iter().next() {
                        rounds.push(run.round);
                        return Err(DeliberationError::ParticipantCallFailed {
                            model: model.to_string(),
                            round: round_number,
                            source,
                            partial_rounds: rounds,
                        });
                    }
                }
                FailureMode::Resilient => {
                    for (model, error) in &run.call_failures {
                        if roster.mark_zombie(model, round_number, error.to_string()) {
                            warn!(
                                "Fire Circle {}: {} demoted to zombie in round {} ({})",
                                fire_circle_id, model, round_number, error
                            );
                            progress.on_participant_zombified(model, round_number);
                        }
                    }
                    // A single bad parse is not evidence the model is
                    // unusable; the stand-in evaluation already carries it
                }
            }

            let agreement = run.round.agreement_score();
            progress.on_round_complete(round_number, agreement);
            rounds.push(run.round);

            if tracker.observe(agreement) {
                info!(
                    "Fire Circle {}: converged after round {} (agreement {:.2})",
                    fire_circle_id,
                    round_number,
                    agreement.unwrap_or_default()
                );
                break;
            }
        }

        // SYNTHESIS: runs over the immutable, completed rounds
        let Some(consensus) = Consensus::worst_case(rounds.iter().flat_map(|r| r.evaluations.values()))
        else {
            return Err(DeliberationError::AllParticipantsFailed);
        };

        let synthesis = Synthesizer::new(params.synthesis_config()).synthesize(&rounds);
        let quorum_valid = roster.min_live_seen() >= params.min_viable_circle;
        let duration = clock.elapsed();

        info!(
            "Fire Circle {} complete: {} rounds, consensus {}, quorum_valid={}",
            fire_circle_id,
            rounds.len(),
            consensus,
            quorum_valid
        );

        Ok(FireCircleResult {
            fire_circle_id,
            started_at,
            participants: input.participants.iter().map(|m| m.to_string()).collect(),
            rounds,
            consensus,
            patterns: synthesis.patterns,
            dissents: synthesis.dissents,
            empty_chair_influence: synthesis.empty_chair_influence,
            quorum_valid,
            duration,
        })
    }
}
