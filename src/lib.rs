//! # mcquiz
//!
//! A multiple-choice quiz engine: questions are presented one at a time,
//! a single selection answers the current question, a timed feedback
//! window (longer for mistakes) auto-advances to the next one, and the
//! completed attempt is submitted to a backend endpoint. The crate ships
//! a terminal host around the engine.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mcquiz::{Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::from_json("questions.json")?
//!         .quiz_id("7")
//!         .submit_url("http://localhost:8000/quiz/submit_attempt/");
//!
//!     quiz.run().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod data;
mod engine;
mod models;
mod report;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

pub use config::QuizConfig;
pub use data::{LoadError, load_questions, load_questions_from_json, parse_questions};
pub use engine::{
    Advanced, AttemptPhase, AttemptState, CompletionSummary, EventBus, EventEnvelope,
    FeedbackScheduler, QuizEngine, QuizEvent, Selection, stars,
};
pub use models::{OptionAppearance, Question};
pub use report::{AttemptPayload, SubmissionJob, SubmitResponse, spawn_http_reporter};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading questions from file.
    Load(LoadError),
    /// IO error during quiz execution.
    Io(io::Error),
    /// Error setting up the submission transport.
    Http(reqwest::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load questions: {}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
            QuizError::Http(e) => write!(f, "HTTP client error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Io(e) => Some(e),
            QuizError::Http(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        QuizError::Http(err)
    }
}

/// How long to wait on the submission endpoint before giving up.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    engine: QuizEngine,
    questions: Vec<Question>,
    quiz_id: Option<String>,
    submit_url: Option<String>,
    result_scroll: usize,
}

impl Quiz {
    /// Create a new quiz from a vector of questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self::with_config(questions, QuizConfig::default())
    }

    /// Create a new quiz with custom feedback windows and star thresholds.
    pub fn with_config(questions: Vec<Question>, config: QuizConfig) -> Self {
        Self {
            engine: QuizEngine::new(config),
            questions,
            quiz_id: None,
            submit_url: None,
            result_scroll: 0,
        }
    }

    /// Load a quiz from a JSON file of questions.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mcquiz::Quiz;
    ///
    /// let quiz = Quiz::from_json("questions.json").expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Ok(Self::new(questions))
    }

    /// Set the opaque quiz identifier forwarded in the submission payload.
    pub fn quiz_id(mut self, quiz_id: impl Into<String>) -> Self {
        self.quiz_id = Some(quiz_id.into());
        self
    }

    /// Set the backend endpoint that receives the completed attempt.
    /// Without one, submission is skipped.
    pub fn submit_url(mut self, url: impl Into<String>) -> Self {
        self.submit_url = Some(url.into());
        self
    }

    /// Get the underlying engine, e.g. to subscribe to its events.
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal, displays the quiz UI, and returns when
    /// the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        if let Some(url) = self.submit_url.clone() {
            let client = reqwest::Client::builder().timeout(SUBMIT_TIMEOUT).build()?;
            let reporter = spawn_http_reporter(client, url, self.engine.event_bus());
            self.engine.set_reporter(reporter).await;
        }

        let mut term = terminal::TerminalGuard::new()?;
        self.event_loop(&mut term).await
    }

    async fn event_loop(&mut self, term: &mut terminal::TerminalGuard) -> Result<(), QuizError> {
        loop {
            {
                let state = self.engine.state().await;
                let upcoming = self.questions.len();
                let scroll = self.result_scroll;
                term.draw(|frame| ui::render(frame, &state, upcoming, scroll))?;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if self.handle_input(key.code).await {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns true if the app should exit.
    async fn handle_input(&mut self, key: KeyCode) -> bool {
        let phase = self.engine.state().await.phase();
        match phase {
            AttemptPhase::NotStarted => self.handle_welcome_input(key).await,
            AttemptPhase::InProgress => self.handle_quiz_input(key).await,
            AttemptPhase::Completed => self.handle_result_input(key).await,
        }
    }

    async fn handle_welcome_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Enter => {
                self.engine
                    .initialize(self.questions.clone(), self.quiz_id.clone())
                    .await;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        }
    }

    async fn handle_quiz_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='9') => {
                // One keypress answers the question; ignored once answered.
                self.engine.select_option(c as usize - '1' as usize).await;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        }
    }

    async fn handle_result_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = self.engine.state().await.total_questions().saturating_sub(1);
                self.result_scroll = (self.result_scroll + 1).min(max_scroll);
                false
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
                false
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.result_scroll = 0;
                self.engine.restart().await;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            _ => false,
        }
    }
}
