//! The attempt state machine and its derived-state calculators.
//!
//! `AttemptState` owns all mutable state for one quiz attempt. Transitions
//! are synchronous and return small effect values; the async engine turns
//! those into timers, events, and the final submission. Derived values are
//! recomputed from the raw fields on every access, never cached.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::QuizConfig;
use crate::engine::stars;
use crate::models::{OptionAppearance, Question};

/// Coarse lifecycle phase, derived from the raw flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    /// Not yet initialized.
    NotStarted,
    /// Questions loaded, attempt underway.
    InProgress,
    /// Final feedback window elapsed; attempt is terminal.
    Completed,
}

/// Effect of a recorded selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub question_index: usize,
    pub selected_index: usize,
    pub is_correct: bool,
}

/// Final numbers for a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub score: usize,
    pub wrong_answers: usize,
    pub elapsed_seconds: u64,
}

/// Effect of an advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advanced {
    /// Moved to the question at `question_index`.
    Moved { question_index: usize },
    /// That was the last question; the attempt is complete.
    Completed(CompletionSummary),
    /// Nothing to do (uninitialized, empty question set, or already done).
    Noop,
}

/// All mutable state for one quiz attempt.
pub struct AttemptState {
    config: QuizConfig,
    /// Correlation id, minted fresh on every (re)initialization.
    attempt: Uuid,
    quiz_id: Option<String>,
    questions: Vec<Question>,
    current_index: usize,
    selected_option: Option<usize>,
    answered: bool,
    completed: bool,
    score: usize,
    wrong_count: usize,
    /// Durable record keyed by question id; submitted at completion.
    answers: BTreeMap<i64, usize>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    /// Re-initialization guard. Cleared only by `restart`.
    initialized: bool,
}

impl AttemptState {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            attempt: Uuid::new_v4(),
            quiz_id: None,
            questions: Vec::new(),
            current_index: 0,
            selected_option: None,
            answered: false,
            completed: false,
            score: 0,
            wrong_count: 0,
            answers: BTreeMap::new(),
            started_at: None,
            ended_at: None,
            initialized: false,
        }
    }

    // --- Transitions ---

    /// Ingest questions and reset all counters, flags, and timers.
    ///
    /// Returns `false` (a no-op) when already initialized; only `restart`
    /// clears the guard. An empty question set is accepted and leaves the
    /// attempt in a permanent "no questions available" state.
    pub fn initialize(&mut self, questions: Vec<Question>, quiz_id: Option<String>) -> bool {
        if self.initialized {
            debug!("initialize ignored: attempt already initialized");
            return false;
        }

        if questions.is_empty() {
            warn!("no questions available, quiz cannot start");
        } else {
            info!("quiz initialized with {} questions", questions.len());
        }

        self.attempt = Uuid::new_v4();
        self.quiz_id = quiz_id;
        self.questions = questions;
        self.current_index = 0;
        self.selected_option = None;
        self.answered = false;
        self.completed = false;
        self.score = 0;
        self.wrong_count = 0;
        self.answers.clear();
        self.started_at = Some(Utc::now());
        self.ended_at = None;
        self.initialized = true;
        true
    }

    /// Record an answer for the current question.
    ///
    /// Valid only while the current question exists and is unanswered;
    /// anything else is a deliberate no-op returning `None`. On success
    /// the selection latches, the score or wrong counter moves, and the
    /// answer lands in the durable map (when the question has an id).
    pub fn select_option(&mut self, index: usize) -> Option<Selection> {
        if self.answered {
            debug!("selection ignored: question already answered");
            return None;
        }
        let Some(question) = self.current_question() else {
            debug!("selection ignored: no current question");
            return None;
        };
        if index >= question.options.len() {
            warn!(
                "selection ignored: option {} out of range for {} options",
                index,
                question.options.len()
            );
            return None;
        }

        let question_id = question.id;
        let is_correct = question.is_correct(index);

        self.selected_option = Some(index);
        self.answered = true;

        match question_id {
            Some(id) => {
                self.answers.insert(id, index);
            }
            None => warn!(
                "question {} has no id; answer omitted from the durable record",
                self.current_index
            ),
        }

        if is_correct {
            self.score += 1;
        } else {
            self.wrong_count += 1;
        }

        Some(Selection {
            question_index: self.current_index,
            selected_index: index,
            is_correct,
        })
    }

    /// Move to the next question, or complete the attempt on the last one.
    ///
    /// Safe to call at any time (it is the timer's entry point): once
    /// completed, or with nothing loaded, it is a no-op.
    pub fn advance(&mut self) -> Advanced {
        if !self.initialized || self.completed || self.questions.is_empty() {
            return Advanced::Noop;
        }

        if self.current_index < self.questions.len() - 1 {
            self.current_index += 1;
            self.answered = false;
            self.selected_option = None;
            Advanced::Moved {
                question_index: self.current_index,
            }
        } else {
            self.completed = true;
            self.ended_at = Some(Utc::now());
            info!("quiz completed, final score {}", self.score);
            Advanced::Completed(CompletionSummary {
                score: self.score,
                wrong_answers: self.wrong_count,
                elapsed_seconds: self.elapsed_seconds(),
            })
        }
    }

    /// Clear the initialization guard and re-run initialization with the
    /// same question source and quiz id.
    pub fn restart(&mut self) {
        let questions = std::mem::take(&mut self.questions);
        let quiz_id = self.quiz_id.take();
        self.initialized = false;
        self.initialize(questions, quiz_id);
    }

    // --- Derived state (pure, recomputed on demand) ---

    pub fn phase(&self) -> AttemptPhase {
        if !self.initialized {
            AttemptPhase::NotStarted
        } else if self.completed {
            AttemptPhase::Completed
        } else {
            AttemptPhase::InProgress
        }
    }

    /// The question at the cursor, or `None` when out of range.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Whether the current selection is correct. `None` until both a
    /// current question and a selection exist.
    pub fn is_correct(&self) -> Option<bool> {
        let question = self.current_question()?;
        let selected = self.selected_option?;
        Some(question.is_correct(selected))
    }

    /// Score as a rounded percentage of all questions; 0 with none loaded.
    pub fn percentage(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.score as f64 / self.questions.len() as f64 * 100.0).round() as u32
    }

    /// Whole seconds between start and end; 0 while either is absent.
    pub fn elapsed_seconds(&self) -> u64 {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => (end - start).num_seconds().max(0) as u64,
            _ => 0,
        }
    }

    /// Elapsed seconds once the attempt has both timestamps, for display
    /// via [`stars::format_elapsed`]; `None` renders the placeholder.
    pub fn final_elapsed_seconds(&self) -> Option<u64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds().max(0) as u64),
            _ => None,
        }
    }

    /// Half-step 0–5 rating. Derived from the wrong-answer count rather
    /// than the score, so unanswered questions do not count against it.
    pub fn star_rating(&self) -> f32 {
        let total = self.questions.len();
        if total == 0 {
            return 0.0;
        }
        let performance =
            ((total - self.wrong_count) as f64 / total as f64 * 100.0).round() as u32;
        stars::star_rating(performance, &self.config.star_thresholds)
    }

    /// The five-glyph star row for the results screen.
    pub fn star_display(&self) -> String {
        stars::render_stars(self.star_rating(), self.questions.len())
    }

    /// Visual state of one option of the current question.
    pub fn option_appearance(&self, index: usize) -> OptionAppearance {
        let Some(question) = self.current_question() else {
            return OptionAppearance::Selectable;
        };
        if !self.answered {
            return OptionAppearance::Selectable;
        }
        if question.is_correct(index) {
            OptionAppearance::RevealedCorrect
        } else if self.selected_option == Some(index) {
            OptionAppearance::RevealedIncorrectChosen
        } else {
            OptionAppearance::RevealedOther
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn attempt(&self) -> Uuid {
        self.attempt
    }

    pub fn quiz_id(&self) -> Option<&str> {
        self.quiz_id.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn wrong_count(&self) -> usize {
        self.wrong_count
    }

    pub fn answers(&self) -> &BTreeMap<i64, usize> {
        &self.answers
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }
}
