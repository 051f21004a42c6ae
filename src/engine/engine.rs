//! The async quiz engine.
//!
//! All mutation funnels through one mutex, so every public operation is
//! atomic with respect to observers: a user selection, a feedback timer
//! firing, and a restart can never interleave mid-transition. The
//! feedback timer re-enters through the same mutex; cancelling it while
//! the lock is held means a fired-but-not-yet-run timer can never outrun
//! the transition that cancels it.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard, mpsc};

use crate::config::QuizConfig;
use crate::engine::attempt::{Advanced, AttemptState};
use crate::engine::events::{EventBus, EventEnvelope, QuizEvent};
use crate::engine::scheduler::FeedbackScheduler;
use crate::models::Question;
use crate::report::{AttemptPayload, SubmissionJob};

struct EngineInner {
    state: AttemptState,
    scheduler: FeedbackScheduler,
    reporter: Option<mpsc::UnboundedSender<SubmissionJob>>,
}

/// Serialized owner of one quiz attempt.
///
/// Cheap to clone; clones share the same attempt.
#[derive(Clone)]
pub struct QuizEngine {
    inner: Arc<Mutex<EngineInner>>,
    bus: EventBus,
}

impl QuizEngine {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                state: AttemptState::new(config),
                scheduler: FeedbackScheduler::new(),
                reporter: None,
            })),
            bus: EventBus::new(),
        }
    }

    /// Register an observer for the engine's notifications.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EventEnvelope> {
        self.bus.subscribe()
    }

    /// The bus the engine emits on, for wiring in outcome reporters.
    pub fn event_bus(&self) -> EventBus {
        self.bus.clone()
    }

    /// Install the transport that receives completed-attempt payloads.
    pub async fn set_reporter(&self, reporter: mpsc::UnboundedSender<SubmissionJob>) {
        self.inner.lock().await.reporter = Some(reporter);
    }

    /// Ingest questions and start the attempt clock.
    ///
    /// A second call while initialized is a no-op; `restart` is the only
    /// way to re-run initialization.
    pub async fn initialize(&self, questions: Vec<Question>, quiz_id: Option<String>) {
        let mut inner = self.inner.lock().await;
        if inner.state.initialize(questions, quiz_id) {
            self.emit_initialized(&inner.state);
        }
    }

    /// Record an answer for the current question and arm the feedback
    /// window. Ignored (no-op) when already answered or no question.
    pub async fn select_option(&self, index: usize) {
        let mut inner = self.inner.lock().await;
        let Some(selection) = inner.state.select_option(index) else {
            return;
        };

        self.bus.emit(
            inner.state.attempt(),
            QuizEvent::AnswerSelected {
                question_index: selection.question_index,
                selected_index: selection.selected_index,
                is_correct: selection.is_correct,
            },
        );

        let delay = inner.state.config().feedback_duration(selection.is_correct);
        debug!(
            "feedback window {:?} ({})",
            delay,
            if selection.is_correct { "correct" } else { "incorrect" }
        );
        let engine = self.clone();
        inner.scheduler.arm(delay, async move {
            engine.advance().await;
        });
    }

    /// Move past the current question, completing the attempt on the last
    /// one. Always clears the feedback timer first; safe to re-enter.
    pub async fn advance(&self) {
        let mut inner = self.inner.lock().await;
        inner.scheduler.cancel();

        match inner.state.advance() {
            Advanced::Moved { question_index } => {
                self.bus
                    .emit(inner.state.attempt(), QuizEvent::QuestionChanged { question_index });
            }
            Advanced::Completed(summary) => {
                self.bus.emit(
                    inner.state.attempt(),
                    QuizEvent::QuizCompleted {
                        score: summary.score,
                        wrong_answers: summary.wrong_answers,
                        elapsed_seconds: summary.elapsed_seconds,
                    },
                );
                Self::submit_completed(&mut inner);
            }
            Advanced::Noop => {}
        }
    }

    /// Neutralize any pending feedback timer, reset the attempt, and
    /// re-run initialization with the same question source.
    pub async fn restart(&self) {
        let mut inner = self.inner.lock().await;
        inner.scheduler.cancel();
        inner.state.restart();
        self.emit_initialized(&inner.state);
        self.bus
            .emit(inner.state.attempt(), QuizEvent::QuizRestarted);
    }

    /// Read access to the attempt state, for rendering and tests.
    pub async fn state(&self) -> MappedMutexGuard<'_, AttemptState> {
        MutexGuard::map(self.inner.lock().await, |inner| &mut inner.state)
    }

    /// Whether a feedback timer is armed and has not yet advanced.
    pub async fn feedback_pending(&self) -> bool {
        self.inner.lock().await.scheduler.is_pending()
    }

    fn emit_initialized(&self, state: &AttemptState) {
        self.bus.emit(
            state.attempt(),
            QuizEvent::QuizInitialized {
                question_count: state.total_questions(),
                quiz_id: state.quiz_id().map(str::to_string),
            },
        );
    }

    /// Hand the completed attempt to the transport, at most once.
    fn submit_completed(inner: &mut EngineInner) {
        let Some(payload) = AttemptPayload::from_attempt(&inner.state) else {
            warn!("quiz id missing at completion; submission skipped");
            return;
        };
        let Some(reporter) = &inner.reporter else {
            debug!("no submission transport configured");
            return;
        };
        let job = SubmissionJob {
            attempt: inner.state.attempt(),
            payload,
        };
        if reporter.send(job).is_err() {
            warn!("submission transport gone; attempt not submitted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn question(id: i64, answer_index: usize) -> Question {
        Question {
            id: Some(id),
            text: format!("Question {}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer_index,
            tag: None,
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![question(11, 0), question(12, 0), question(13, 0)]
    }

    async fn engine_with_reporter() -> (QuizEngine, mpsc::UnboundedReceiver<SubmissionJob>) {
        let engine = QuizEngine::new(QuizConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        engine.set_reporter(tx).await;
        (engine, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<EventEnvelope>) -> Vec<QuizEvent> {
        let mut events = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            events.push(envelope.event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_auto_advances_after_short_window() {
        let (engine, _rx) = engine_with_reporter().await;
        engine.initialize(three_questions(), Some("7".into())).await;

        engine.select_option(0).await;
        assert!(engine.feedback_pending().await);

        // Default correct window is 3s.
        tokio::time::sleep(Duration::from_millis(3200)).await;
        let state = engine.state().await;
        assert_eq!(state.current_index(), 1);
        assert!(!state.is_answered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_incorrect_answer_waits_for_longer_window() {
        let (engine, _rx) = engine_with_reporter().await;
        engine.initialize(three_questions(), Some("7".into())).await;

        engine.select_option(3).await;

        // Past the correct window but inside the incorrect one.
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(engine.state().await.current_index(), 0);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(engine.state().await.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_selection_is_ignored_and_leaves_one_timer() {
        let (engine, _rx) = engine_with_reporter().await;
        engine.initialize(three_questions(), Some("7".into())).await;
        let mut events = engine.subscribe();

        engine.select_option(1).await; // incorrect, 5s window
        engine.select_option(0).await; // ignored: already answered
        assert!(engine.feedback_pending().await);

        {
            let state = engine.state().await;
            assert_eq!(state.selected_option(), Some(1));
            assert_eq!(state.score(), 0);
            assert_eq!(state.wrong_count(), 1);
        }

        // Exactly one advance fires.
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(engine.state().await.current_index(), 1);
        let moved = drain(&mut events)
            .into_iter()
            .filter(|e| matches!(e, QuizEvent::QuestionChanged { .. }))
            .count();
        assert_eq!(moved, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_feedback_timer() {
        let (engine, _rx) = engine_with_reporter().await;
        engine.initialize(three_questions(), Some("7".into())).await;

        engine.select_option(3).await;
        assert!(engine.feedback_pending().await);

        engine.restart().await;
        assert!(!engine.feedback_pending().await);

        // No stray advance after the restart.
        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = engine.state().await;
        assert_eq!(state.current_index(), 0);
        assert!(!state.is_answered());
        assert_eq!(state.score(), 0);
        assert_eq!(state.wrong_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_submits_exactly_once() {
        let (engine, mut reporter) = engine_with_reporter().await;
        let mut events = engine.subscribe();
        engine.initialize(three_questions(), Some("7".into())).await;

        // correct, incorrect, correct
        engine.select_option(0).await;
        tokio::time::sleep(Duration::from_secs(4)).await;
        engine.select_option(2).await;
        tokio::time::sleep(Duration::from_secs(6)).await;
        engine.select_option(0).await;
        tokio::time::sleep(Duration::from_secs(4)).await;

        {
            let state = engine.state().await;
            assert!(state.is_completed());
            assert!(state.ended_at().is_some());
            assert_eq!(state.score(), 2);
            assert_eq!(state.wrong_count(), 1);
            assert_eq!(state.percentage(), 67);
        }

        let job = reporter.try_recv().unwrap();
        assert_eq!(job.payload.quiz_id, "7");
        assert_eq!(job.payload.score, 2);
        assert_eq!(job.payload.total_questions, 3);
        assert_eq!(job.payload.percentage, 67);
        assert_eq!(job.payload.answers.len(), 3);
        assert_eq!(job.payload.answers.get("11"), Some(&0));
        assert_eq!(job.payload.answers.get("12"), Some(&2));
        assert_eq!(job.payload.answers.get("13"), Some(&0));
        // At most one submission per completed attempt.
        assert!(reporter.try_recv().is_err());

        let emitted = drain(&mut events);
        assert!(emitted.iter().any(|e| matches!(
            e,
            QuizEvent::QuizCompleted {
                score: 2,
                wrong_answers: 1,
                ..
            }
        )));

        // Completed is terminal; further operations are no-ops.
        engine.select_option(0).await;
        engine.advance().await;
        assert_eq!(engine.state().await.score(), 2);
        assert!(reporter.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_quiz_id_skips_submission() {
        let (engine, mut reporter) = engine_with_reporter().await;
        engine.initialize(vec![question(1, 0)], None).await;

        engine.select_option(0).await;
        tokio::time::sleep(Duration::from_secs(4)).await;

        assert!(engine.state().await.is_completed());
        assert!(reporter.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_source_never_completes() {
        let (engine, mut reporter) = engine_with_reporter().await;
        engine.initialize(Vec::new(), Some("7".into())).await;

        engine.select_option(0).await;
        engine.advance().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        let state = engine.state().await;
        assert!(state.current_question().is_none());
        assert!(!state.is_completed());
        drop(state);
        assert!(reporter.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_emits_initialized_then_restarted() {
        let (engine, _rx) = engine_with_reporter().await;
        engine.initialize(three_questions(), Some("7".into())).await;
        let mut events = engine.subscribe();

        engine.restart().await;
        let emitted = drain(&mut events);
        assert!(matches!(
            emitted[0],
            QuizEvent::QuizInitialized {
                question_count: 3,
                ..
            }
        ));
        assert!(matches!(emitted[1], QuizEvent::QuizRestarted));
    }
}
