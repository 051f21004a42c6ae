//! Notifications for external observers.
//!
//! All events are serialized as tagged JSON, mirroring the names the
//! hosting page listens for. They exist for observers (tests, analytics,
//! presentation); no internal transition depends on them being consumed.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Notifications emitted over the lifetime of an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuizEvent {
    /// Questions ingested, attempt ready.
    QuizInitialized {
        question_count: usize,
        quiz_id: Option<String>,
    },

    /// An answer was recorded for the current question.
    AnswerSelected {
        question_index: usize,
        selected_index: usize,
        is_correct: bool,
    },

    /// Advanced to a new question.
    QuestionChanged { question_index: usize },

    /// The last feedback window elapsed; the attempt is final.
    QuizCompleted {
        score: usize,
        wrong_answers: usize,
        elapsed_seconds: u64,
    },

    /// The attempt was reset and re-initialized.
    QuizRestarted,

    /// The backend accepted the submission.
    ResultsSubmitted { attempt_id: i64 },

    /// Submission failed; the attempt still shows as completed.
    ResultsSubmissionFailed { reason: String },
}

/// An event plus its emission timestamp and attempt correlation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Correlation id of the attempt that emitted this event.
    pub attempt: Uuid,
    /// When the event was emitted (UTC).
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: QuizEvent,
}

/// Fan-out channel from the engine to any number of observers.
///
/// Subscribers that drop their receiver are pruned on the next emit.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<EventEnvelope>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer and return its receiving end.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EventEnvelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    /// Deliver an event to every live subscriber.
    pub fn emit(&self, attempt: Uuid, event: QuizEvent) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };
        let envelope = EventEnvelope {
            attempt,
            at: Utc::now(),
            event,
        };
        subscribers.retain(|tx| tx.send(envelope.clone()).is_ok());
    }
}
