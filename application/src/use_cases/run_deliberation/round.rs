//! Round coordinator — one round of concurrent participant calls
//!
//! All live participants are called in parallel; each call carries its
//! own timeout. No shared state is touched while calls are in flight:
//! every task returns its own outcome, merged only after the `JoinSet`
//! drains. The round cannot close before every live participant has
//! either returned or timed out, so round duration is bounded by the
//! slowest live call.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{DeliberationProgress, EvaluationOutcomeKind};
use circle_domain::{
    EvaluationTarget, Model, NeutrosophicEvaluation, PromptTemplate, Round, parse_evaluation,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A completed round plus the failures the engine must act on
#[derive(Debug)]
pub(crate) struct RoundRun {
    /// The sealed, immutable round (parse-failure stand-ins included)
    pub round: Round,
    /// Participants whose calls failed or timed out
    pub call_failures: Vec<(Model, GatewayError)>,
    /// Participants whose responses did not parse, with the cause
    pub parse_failures: Vec<(Model, String)>,
}

/// Coordinates the concurrent calls of one round
pub(crate) struct RoundCoordinator<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    call_timeout: Duration,
}

impl<G: LlmGateway + 'static> RoundCoordinator<G> {
    pub fn new(gateway: Arc<G>, call_timeout: Duration) -> Self {
        Self {
            gateway,
            call_timeout,
        }
    }

    /// Run one round over the given live participants.
    ///
    /// The empty chair differs only in its system prompt — there is no
    /// separate code path for it.
    pub async fn run_round(
        &self,
        round_number: usize,
        live: &[Model],
        empty_chair: &Model,
        target: &EvaluationTarget,
        history: &[Round],
        progress: &dyn DeliberationProgress,
    ) -> RoundRun {
        let user_prompt = PromptTemplate::evaluation_prompt(target, history);
        let mut join_set = JoinSet::new();

        for model in live {
            let gateway = Arc::clone(&self.gateway);
            let model = model.clone();
            let system_prompt = if &model == empty_chair {
                PromptTemplate::empty_chair_system()
            } else {
                PromptTemplate::evaluation_system()
            };
            let prompt = user_prompt.clone();
            let timeout = self.call_timeout;

            join_set.spawn(async move {
                let started = Instant::now();
                let outcome = Self::call_participant(&gateway, &model, system_prompt, &prompt, timeout)
                    .await;
                (model, started.elapsed(), outcome)
            });
        }

        let mut evaluations = BTreeMap::new();
        let mut model_latencies = BTreeMap::new();
        let mut call_failures = Vec::new();
        let mut parse_failures = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            let (model, latency, outcome) = match joined {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Participant task join error: {}", e);
                    continue;
                }
            };
            model_latencies.insert(model.to_string(), latency);

            match outcome {
                Ok(raw) => {
                    // Either a genuine evaluation or the stand-in; both
                    // enter the round as data
                    let (evaluation, kind) = match parse_evaluation(&raw) {
                        Ok(fields) => (
                            NeutrosophicEvaluation::new(
                                model.to_string(),
                                fields.truth,
                                fields.indeterminacy,
                                fields.falsehood,
                                fields.reasoning,
                            ),
                            EvaluationOutcomeKind::Ok,
                        ),
                        Err(fail) => {
                            debug!(
                                "Round {}: {} response did not parse: {}",
                                round_number, model, fail.cause
                            );
                            parse_failures.push((model.clone(), fail.cause.clone()));
                            (
                                NeutrosophicEvaluation::parse_error(
                                    model.to_string(),
                                    &fail.cause,
                                    fail.raw_text,
                                ),
                                EvaluationOutcomeKind::ParseFailure,
                            )
                        }
                    };
                    evaluations.insert(model.to_string(), evaluation);
                    progress.on_evaluation_complete(round_number, &model, kind);
                }
                Err(e) => {
                    warn!("Round {}: call to {} failed: {}", round_number, model, e);
                    progress.on_evaluation_complete(
                        round_number,
                        &model,
                        EvaluationOutcomeKind::CallFailure,
                    );
                    call_failures.push((model, e));
                }
            }
        }

        let round = Round::new(
            round_number,
            empty_chair.to_string(),
            evaluations,
            model_latencies,
        );

        RoundRun {
            round,
            call_failures,
            parse_failures,
        }
    }

    /// One participant call: session setup plus send, under one timeout
    async fn call_participant(
        gateway: &G,
        model: &Model,
        system_prompt: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, GatewayError> {
        let call = async {
            let session = gateway
                .create_session_with_system_prompt(model, system_prompt)
                .await?;
            session.send(prompt).await
        };
        tokio::time::timeout(timeout, call)
            .await
            .unwrap_or(Err(GatewayError::Timeout))
    }
}
