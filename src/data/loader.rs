use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::warn;

use crate::models::Question;

/// Error loading questions from a file.
#[derive(Debug)]
pub enum LoadError {
    /// Could not read the file.
    Io(io::Error),
    /// File contents were not valid question JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read questions file: {}", e),
            LoadError::Parse(e) => write!(f, "failed to parse questions: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

/// Parse a question set from raw JSON, degrading instead of failing.
///
/// This is the widget path: malformed input yields an empty list and the
/// quiz shows "no questions available" rather than crashing. Individual
/// records with no options or an out-of-range `answerIndex` are dropped.
pub fn parse_questions(raw: &str) -> Vec<Question> {
    let parsed: Vec<Question> = match serde_json::from_str(raw) {
        Ok(questions) => questions,
        Err(e) => {
            warn!("malformed question data, falling back to empty set: {}", e);
            return Vec::new();
        }
    };

    sanitize(parsed)
}

/// Load a question set from a JSON file, degrading instead of failing.
pub fn load_questions(path: impl AsRef<Path>) -> Vec<Question> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(raw) => parse_questions(&raw),
        Err(e) => {
            warn!("could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Load a question set from a JSON file, surfacing errors.
///
/// This is the host/CLI path, where a missing or unreadable file should be
/// reported to the operator instead of silently becoming an empty quiz.
pub fn load_questions_from_json(path: impl AsRef<Path>) -> Result<Vec<Question>, LoadError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let parsed: Vec<Question> = serde_json::from_str(&raw)?;
    Ok(sanitize(parsed))
}

/// Drop records the state machine cannot safely present.
fn sanitize(questions: Vec<Question>) -> Vec<Question> {
    questions
        .into_iter()
        .enumerate()
        .filter_map(|(i, q)| {
            if q.options.is_empty() {
                warn!("dropping question {} ({:?}): no options", i, q.id);
                None
            } else if q.answer_index >= q.options.len() {
                warn!(
                    "dropping question {} ({:?}): answerIndex {} out of range for {} options",
                    i,
                    q.id,
                    q.answer_index,
                    q.options.len()
                );
                None
            } else {
                Some(q)
            }
        })
        .collect()
}
