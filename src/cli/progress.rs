// src/cli/progress.rs — Terminal rendering of run events

use std::io::Write;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::events::{Phase, RunEvent};

/// Consume run events and render them. Fragments stream to stdout as they
/// arrive; lifecycle markers go to stderr so piped output stays clean.
pub async fn print_events(mut rx: UnboundedReceiver<RunEvent>) {
    let mut last_phase: Option<Phase> = None;

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::RunStarted { rounds, .. } => {
                eprintln!("[run] up to {} round(s)", rounds);
            }
            RunEvent::RoundStarted { round, total } => {
                last_phase = None;
                eprintln!("\n[round {}/{}]", round, total);
            }
            RunEvent::Fragment { phase, content } => {
                if last_phase != Some(phase) {
                    eprintln!("[{}]", phase_label(phase));
                    last_phase = Some(phase);
                }
                print!("{}", content);
                let _ = std::io::stdout().flush();
            }
            RunEvent::RoundSkipped { round } => {
                eprintln!("[round {}] empty solution, skipped", round);
            }
            RunEvent::Scored { round, score } => {
                eprintln!("\n[round {}] score {}/10", round, score);
            }
            RunEvent::NewBest { round, score } => {
                eprintln!("[round {}] new best ({}/10)", round, score);
            }
            RunEvent::ThresholdReached { round, score } => {
                eprintln!(
                    "[round {}] {}/10 meets the quality bar, stopping early",
                    round, score
                );
            }
            RunEvent::Completed { best_score, .. } => {
                eprintln!("\n[done] best score {}/10", best_score);
            }
            RunEvent::Error { message } => {
                eprintln!("[error] {}", message);
            }
        }
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Solve => "solve",
        Phase::Review => "review",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_labels() {
        assert_eq!(phase_label(Phase::Solve), "solve");
        assert_eq!(phase_label(Phase::Review), "review");
    }
}
