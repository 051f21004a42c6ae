//! HTTP transport for attempt submissions.
//!
//! The engine never talks to the network directly: it pushes a
//! [`SubmissionJob`] onto a channel and this task does the POST, turning
//! the outcome into a `results-submitted` or `results-submission-failed`
//! event. Failures never propagate; at most one attempt per job.

use log::{info, warn};
use tokio::sync::mpsc;

use crate::engine::{EventBus, QuizEvent};

use super::payload::{AttemptPayload, SubmissionJob, SubmitResponse};

/// Spawn the reporter task and return its inbox.
pub fn spawn_http_reporter(
    client: reqwest::Client,
    url: String,
    bus: EventBus,
) -> mpsc::UnboundedSender<SubmissionJob> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SubmissionJob>();

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match submit(&client, &url, &job.payload).await {
                Ok(attempt_id) => {
                    info!(
                        "attempt for quiz {} saved as attempt_id {}",
                        job.payload.quiz_id, attempt_id
                    );
                    bus.emit(job.attempt, QuizEvent::ResultsSubmitted { attempt_id });
                }
                Err(reason) => {
                    warn!(
                        "submission for quiz {} failed: {}",
                        job.payload.quiz_id, reason
                    );
                    bus.emit(job.attempt, QuizEvent::ResultsSubmissionFailed { reason });
                }
            }
        }
    });

    tx
}

async fn submit(
    client: &reqwest::Client,
    url: &str,
    payload: &AttemptPayload,
) -> Result<i64, String> {
    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|e| format!("transport error: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("server returned {}", status));
    }

    let body: SubmitResponse = response
        .json()
        .await
        .map_err(|e| format!("unparseable response: {}", e))?;

    if body.status != "success" {
        return Err(format!("server reported status {:?}", body.status));
    }
    body.attempt_id
        .ok_or_else(|| "response missing attempt_id".to_string())
}
