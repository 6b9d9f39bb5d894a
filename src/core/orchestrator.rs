// src/core/orchestrator.rs — Round loop controller

use std::time::Instant;

use crate::backend::{decoder, BackendClient};
use crate::core::events::{EventSink, Phase, RunEvent};
use crate::core::prompt;
use crate::core::score::extract_score;
use crate::core::types::{GenerationContext, RoundRecord, RunResult, RunStatus};
use crate::infra::config::RoundsConfig;
use crate::infra::errors::TandemError;

/// A round at or above this score ends the run early.
const SCORE_THRESHOLD: u8 = 9;

/// Decoded solutions that mean the solver produced nothing usable.
const INVALID_SOLUTIONS: [&str; 2] = ["undefined", "null"];

/// Drives the generate-review-score loop for a single run.
///
/// One orchestrator owns its two clients and its run state exclusively;
/// a concurrent run needs a separate instance. Within a run everything
/// after the connection check is strictly sequential.
pub struct Orchestrator {
    solver: BackendClient,
    reviewer: BackendClient,
    rounds: RoundsConfig,
    sink: EventSink,
}

impl Orchestrator {
    pub fn new(solver: BackendClient, reviewer: BackendClient, rounds: RoundsConfig) -> Self {
        Self {
            solver,
            reviewer,
            rounds,
            sink: EventSink::null(),
        }
    }

    /// Attach the event channel the run reports into.
    pub fn with_sink(mut self, sink: EventSink) -> Self {
        self.sink = sink;
        self
    }

    /// Run the full loop: connection check, then up to the clamped round
    /// budget of generate-review cycles.
    ///
    /// Backend failures finalize the result with `RunStatus::Error`;
    /// records for rounds completed before the failure are kept. The only
    /// input rejected outright is an empty problem.
    pub async fn run(
        &mut self,
        problem: &str,
        rounds: Option<u8>,
    ) -> Result<RunResult, TandemError> {
        if problem.trim().is_empty() {
            return Err(TandemError::Config("problem must not be empty".into()));
        }

        let budget = self.rounds.clamp(rounds);
        let start = Instant::now();
        let mut result = RunResult::new(problem);

        self.sink.emit(RunEvent::RunStarted {
            problem: problem.to_string(),
            rounds: budget,
        });

        // The probes are the only concurrent backend calls in a run.
        let (solver_ok, reviewer_ok) = tokio::join!(
            self.solver.check_availability(),
            self.reviewer.check_availability(),
        );
        if !solver_ok || !reviewer_ok {
            let backend = if !solver_ok {
                self.solver.name()
            } else {
                self.reviewer.name()
            };
            let err = TandemError::Connectivity {
                backend: backend.to_string(),
                reason: "liveness probe failed or model missing".into(),
            };
            let message = err.to_string();
            tracing::error!("{}", message);
            self.sink.emit(RunEvent::Error {
                message: message.clone(),
            });
            result.finish(RunStatus::Error, Some(message), start.elapsed());
            return Ok(result);
        }

        match self.round_loop(problem, budget, &mut result).await {
            Ok(()) => {
                let (best_score, solution) = match result.best_record() {
                    Some(best) => (best.score, best.solution.clone()),
                    None => (0, "(no solution produced)".to_string()),
                };
                self.sink.emit(RunEvent::Completed {
                    best_score,
                    solution,
                });
                result.finish(RunStatus::Success, None, start.elapsed());
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Run failed: {}", message);
                self.sink.emit(RunEvent::Error {
                    message: message.clone(),
                });
                result.finish(RunStatus::Error, Some(message), start.elapsed());
            }
        }
        Ok(result)
    }

    async fn round_loop(
        &self,
        problem: &str,
        budget: u8,
        result: &mut RunResult,
    ) -> Result<(), TandemError> {
        for round in 1..=budget {
            let round_start = Instant::now();
            self.sink.emit(RunEvent::RoundStarted {
                round,
                total: budget,
            });

            // Revise the best solution so far; fresh generation until one
            // exists.
            let ctx = match result.best_record() {
                Some(best) => GenerationContext::revision(
                    problem,
                    best.solution.clone(),
                    prompt::feedback_summary(best.score),
                ),
                None => GenerationContext::fresh(problem),
            };

            let response = self.solver.generate(&ctx, true).await?;
            let solution =
                decoder::collect_stream(response, self.solver.format(), &self.sink, Phase::Solve)
                    .await;

            if !is_usable(&solution) {
                tracing::warn!(round, "Solver returned no usable solution; skipping review");
                self.sink.emit(RunEvent::RoundSkipped { round });
                result.stats.rounds_skipped += 1;
                continue;
            }

            let response = self.reviewer.review(problem, &solution, round, true).await?;
            let review = decoder::collect_stream(
                response,
                self.reviewer.format(),
                &self.sink,
                Phase::Review,
            )
            .await;

            let score = extract_score(&review);
            self.sink.emit(RunEvent::Scored { round, score });

            let promoted = result.push_round(RoundRecord {
                round,
                solution,
                review,
                score,
                duration: round_start.elapsed(),
            });
            if promoted {
                self.sink.emit(RunEvent::NewBest { round, score });
            }

            if score >= SCORE_THRESHOLD {
                self.sink.emit(RunEvent::ThresholdReached { round, score });
                break;
            }
        }
        Ok(())
    }
}

/// Empty output and a few literal sentinels count as "no solution".
fn is_usable(solution: &str) -> bool {
    let trimmed = solution.trim();
    !trimmed.is_empty() && !INVALID_SOLUTIONS.contains(&trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_rejects_empty_and_sentinels() {
        assert!(!is_usable(""));
        assert!(!is_usable("   \n"));
        assert!(!is_usable("undefined"));
        assert!(!is_usable("  null  "));
        assert!(is_usable("function f() {}"));
    }

    #[tokio::test]
    async fn test_empty_problem_rejected() {
        let config = crate::infra::config::Config::default();
        let mut orchestrator = Orchestrator::new(
            BackendClient::new("solver", &config.solver),
            BackendClient::new("reviewer", &config.reviewer),
            config.rounds,
        );
        assert!(orchestrator.run("   ", Some(1)).await.is_err());
    }
}
