//! Application errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::flags::{StoreError, SubmissionError};
use crate::http::response::EVENT_LOGGED;

#[derive(Debug, Error)]
pub enum AppError {
    /// The submission had no element containing six hex digits.
    #[error("submission contains no hex color")]
    NoHexColor,

    /// The body is not a JSON array of strings.
    #[error("malformed flag submission: {0}")]
    MalformedSubmission(String),

    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NoHexColor => AppError::NoHexColor,
            SubmissionError::Malformed(e) => AppError::MalformedSubmission(e.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoHexColor | AppError::MalformedSubmission(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // Same text as a successful submission.
            AppError::NoHexColor => EVENT_LOGGED,
            AppError::MalformedSubmission(_) => "Malformed flag submission",
            AppError::PayloadTooLarge(_) => "Payload Too Large",
            AppError::MethodNotAllowed => "Method Not Allowed",
            AppError::Store(_) => "Internal Server Error",
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NoHexColor.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::MalformedSubmission("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Store(StoreError::Database(sqlx::Error::RowNotFound)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_submission_error() {
        let err: AppError = SubmissionError::NoHexColor.into();
        assert!(matches!(err, AppError::NoHexColor));

        let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err: AppError = SubmissionError::Malformed(json_err).into();
        assert!(matches!(err, AppError::MalformedSubmission(_)));
    }
}
