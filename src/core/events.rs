// src/core/events.rs — Run event channel

use tokio::sync::mpsc;

/// Which half of a round a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Solve,
    Review,
}

/// Events a run emits, in order, over a single-consumer channel.
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted { problem: String, rounds: u8 },
    RoundStarted { round: u8, total: u8 },
    Fragment { phase: Phase, content: String },
    RoundSkipped { round: u8 },
    Scored { round: u8, score: u8 },
    NewBest { round: u8, score: u8 },
    ThresholdReached { round: u8, score: u8 },
    Completed { best_score: u8, solution: String },
    Error { message: String },
}

/// Sending half of the run event channel.
///
/// A detached or lagging consumer must never fail the run, so send errors
/// are swallowed.
#[derive(Clone)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards everything. Used for buffered runs where only
    /// the final `RunResult` matters.
    pub fn null() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: RunEvent) {
        if let Some(ref tx) = self.tx {
            let _ = tx.send(event);
        }
    }
}
