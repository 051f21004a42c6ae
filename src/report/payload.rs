//! Submission payload for completed attempts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AttemptState;

/// The JSON body POSTed to the backend at completion.
///
/// Field names are fixed by the backend route; `answers` maps the
/// question id (stringified, as JSON object keys are) to the selected
/// option index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptPayload {
    pub quiz_id: String,
    pub score: usize,
    pub total_questions: usize,
    pub percentage: u32,
    pub end_time: DateTime<Utc>,
    pub answers: BTreeMap<String, usize>,
}

impl AttemptPayload {
    /// Build the payload for a completed attempt.
    ///
    /// `None` when the attempt has no quiz id or no end timestamp; the
    /// caller decides how to report the skip.
    pub fn from_attempt(state: &AttemptState) -> Option<Self> {
        let quiz_id = state.quiz_id()?.to_string();
        let end_time = state.ended_at()?;
        Some(Self {
            quiz_id,
            score: state.score(),
            total_questions: state.total_questions(),
            percentage: state.percentage(),
            end_time,
            answers: state
                .answers()
                .iter()
                .map(|(id, index)| (id.to_string(), *index))
                .collect(),
        })
    }
}

/// The backend's response to an accepted submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    #[serde(default)]
    pub attempt_id: Option<i64>,
}

/// One unit of work for the reporter task.
#[derive(Debug, Clone)]
pub struct SubmissionJob {
    /// Attempt correlation id, echoed into the outcome event.
    pub attempt: Uuid,
    pub payload: AttemptPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payload_wire_shape() {
        let payload = AttemptPayload {
            quiz_id: "7".to_string(),
            score: 2,
            total_questions: 3,
            percentage: 67,
            end_time: Utc.with_ymd_and_hms(2026, 8, 7, 12, 34, 56).unwrap(),
            answers: BTreeMap::from([("11".to_string(), 0), ("12".to_string(), 2)]),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["quiz_id"], "7");
        assert_eq!(json["score"], 2);
        assert_eq!(json["total_questions"], 3);
        assert_eq!(json["percentage"], 67);
        assert_eq!(json["answers"]["11"], 0);
        assert_eq!(json["answers"]["12"], 2);
        // RFC 3339 UTC with a trailing Z, as the backend expects.
        let end_time = json["end_time"].as_str().unwrap();
        assert!(end_time.starts_with("2026-08-07T12:34:56"));
        assert!(end_time.ends_with('Z'));
    }

    #[test]
    fn test_response_parsing() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"status": "success", "attempt_id": 42}"#).unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(response.attempt_id, Some(42));

        let response: SubmitResponse = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(response.attempt_id, None);
    }
}
