//! Result reporting: payload construction and the HTTP boundary.

mod http;
mod payload;

pub use http::spawn_http_reporter;
pub use payload::{AttemptPayload, SubmissionJob, SubmitResponse};
