use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Configuration problems detected while serving a backup request.
///
/// Each one aborts the whole run before any target is touched and is
/// reported to the caller as a plain-text 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing GCS_BUCKET env var")]
    MissingBucket,

    #[error("Missing MONGO_LIST env var (from Secret Manager)")]
    MissingMongoList,

    #[error("Unable to read MONGO_LIST_FILE: {0}")]
    UnreadableMongoList(String),

    #[error("Invalid MONGO_LIST JSON: {0}")]
    InvalidMongoList(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
