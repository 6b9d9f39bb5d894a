// src/core/types.rs — Round and run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inputs for one solver call. Both carry-over fields are empty on the
/// first round.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub problem: String,
    pub previous_solution: String,
    pub previous_feedback: String,
}

impl GenerationContext {
    pub fn fresh(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            ..Default::default()
        }
    }

    pub fn revision(
        problem: impl Into<String>,
        previous_solution: impl Into<String>,
        previous_feedback: impl Into<String>,
    ) -> Self {
        Self {
            problem: problem.into(),
            previous_solution: previous_solution.into(),
            previous_feedback: previous_feedback.into(),
        }
    }

    /// The revision template applies only when both carry-over fields are
    /// present.
    pub fn is_revision(&self) -> bool {
        !self.previous_solution.is_empty() && !self.previous_feedback.is_empty()
    }
}

/// One completed generate-review cycle. Appended once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u8,
    pub solution: String,
    pub review: String,
    pub score: u8,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub rounds_completed: u8,
    pub rounds_skipped: u8,
    pub best_score: u8,
    pub total_duration: Duration,
}

/// Everything a run produced. Owned by one orchestrator instance for the
/// run's lifetime; a second run gets a fresh value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub problem: String,
    pub rounds: Vec<RoundRecord>,
    /// Index into `rounds` of the best-scoring record. Ties keep the
    /// earlier record.
    pub best: Option<usize>,
    pub status: RunStatus,
    pub error: Option<String>,
    pub stats: RunStats,
    pub started_at: DateTime<Utc>,
}

impl RunResult {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            problem: problem.into(),
            rounds: Vec::new(),
            best: None,
            status: RunStatus::Success,
            error: None,
            stats: RunStats::default(),
            started_at: Utc::now(),
        }
    }

    pub fn best_record(&self) -> Option<&RoundRecord> {
        self.best.and_then(|i| self.rounds.get(i))
    }

    pub fn best_score(&self) -> u8 {
        self.best_record().map(|r| r.score).unwrap_or(0)
    }

    /// Append a record, promoting it to best only on a strict improvement.
    /// Returns true when the record became the new best.
    pub fn push_round(&mut self, record: RoundRecord) -> bool {
        let promoted = self.best.is_none() || record.score > self.best_score();
        self.rounds.push(record);
        if promoted {
            self.best = Some(self.rounds.len() - 1);
        }
        self.stats.rounds_completed = self.rounds.len() as u8;
        self.stats.best_score = self.best_score();
        promoted
    }

    pub fn finish(&mut self, status: RunStatus, error: Option<String>, total: Duration) {
        self.status = status;
        self.error = error;
        self.stats.total_duration = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(round: u8, score: u8) -> RoundRecord {
        RoundRecord {
            round,
            solution: format!("solution {}", round),
            review: format!("review {}", round),
            score,
            duration: Duration::from_millis(10),
        }
    }

    // ─── GenerationContext ──────────────────────────────────────

    #[test]
    fn test_fresh_context_is_not_revision() {
        let ctx = GenerationContext::fresh("reverse a string");
        assert_eq!(ctx.problem, "reverse a string");
        assert!(!ctx.is_revision());
    }

    #[test]
    fn test_revision_requires_both_fields() {
        let ctx = GenerationContext::revision("p", "code", "");
        assert!(!ctx.is_revision());
        let ctx = GenerationContext::revision("p", "", "feedback");
        assert!(!ctx.is_revision());
        let ctx = GenerationContext::revision("p", "code", "feedback");
        assert!(ctx.is_revision());
    }

    // ─── Best tracking ──────────────────────────────────────────

    #[test]
    fn test_first_record_becomes_best() {
        let mut result = RunResult::new("p");
        assert!(result.push_round(record(1, 0)));
        assert_eq!(result.best, Some(0));
        assert_eq!(result.best_score(), 0);
    }

    #[test]
    fn test_strict_improvement_promotes() {
        let mut result = RunResult::new("p");
        result.push_round(record(1, 4));
        assert!(result.push_round(record(2, 7)));
        assert_eq!(result.best_record().unwrap().round, 2);
    }

    #[test]
    fn test_tie_keeps_earlier_record() {
        let mut result = RunResult::new("p");
        result.push_round(record(1, 6));
        assert!(!result.push_round(record(2, 6)));
        assert_eq!(result.best_record().unwrap().round, 1);
    }

    #[test]
    fn test_regression_keeps_best() {
        let mut result = RunResult::new("p");
        result.push_round(record(1, 8));
        assert!(!result.push_round(record(2, 3)));
        assert_eq!(result.best_record().unwrap().round, 1);
        assert_eq!(result.stats.best_score, 8);
    }

    #[test]
    fn test_best_is_max_over_all_records() {
        let mut result = RunResult::new("p");
        for (round, score) in [(1, 2), (2, 9), (3, 5), (4, 9)] {
            result.push_round(record(round, score));
        }
        let max = result.rounds.iter().map(|r| r.score).max().unwrap();
        assert_eq!(result.best_score(), max);
        // Earliest record at the max wins.
        assert_eq!(result.best_record().unwrap().round, 2);
    }

    #[test]
    fn test_empty_run_has_no_best() {
        let result = RunResult::new("p");
        assert!(result.best_record().is_none());
        assert_eq!(result.best_score(), 0);
    }

    // ─── Finalization ───────────────────────────────────────────

    #[test]
    fn test_finish_records_status_and_duration() {
        let mut result = RunResult::new("p");
        result.finish(
            RunStatus::Error,
            Some("boom".into()),
            Duration::from_secs(2),
        );
        assert_eq!(result.status, RunStatus::Error);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.stats.total_duration, Duration::from_secs(2));
    }

    #[test]
    fn test_stats_track_completed_rounds() {
        let mut result = RunResult::new("p");
        result.push_round(record(1, 3));
        result.push_round(record(2, 5));
        assert_eq!(result.stats.rounds_completed, 2);
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunResult::new("p");
        let b = RunResult::new("p");
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_run_result_serializes() {
        let mut result = RunResult::new("p");
        result.push_round(record(1, 7));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"best_score\":7"));
        let back: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rounds.len(), 1);
    }
}
