//! Request failures and how they map onto HTTP responses

use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use shared::{ErrorBody, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was not JSON or did not have the submission shape
    #[error("Invalid score submission")]
    Malformed(#[source] serde_json::Error),
    /// Reason stays in the log, clients get the generic message
    #[error("Invalid score submission")]
    Invalid(#[from] ValidationError),
    #[error("Origin not allowed")]
    Forbidden,
    #[error("Database connection error")]
    Unavailable,
    #[error("Database insert error")]
    Insert(#[source] StoreError),
    #[error("Rank calculation error")]
    Rank(#[source] StoreError),
    #[error("Database query error")]
    Query(#[source] StoreError),
}

impl ApiError {
    /// Wraps a store failure, reporting an unavailable store the same way for every operation
    pub fn store(err: StoreError, wrap: fn(StoreError) -> ApiError) -> ApiError {
        match err {
            StoreError::Unavailable => ApiError::Unavailable,
            other => wrap(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unavailable
            | ApiError::Insert(_)
            | ApiError::Rank(_)
            | ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(source) => error!("{}: {}", self, source),
                None => error!("{}", self),
            }
        } else {
            match std::error::Error::source(&self) {
                Some(source) => warn!("Rejected request: {}: {}", self, source),
                None => warn!("Rejected request: {}", self),
            }
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let malformed = serde_json::from_str::<shared::ScoreSubmission>("{").unwrap_err();
        assert_eq!(ApiError::Malformed(malformed).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Invalid(ValidationError::Name).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Unavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unavailable_store_collapses_to_connection_error() {
        let err = ApiError::store(StoreError::Unavailable, ApiError::Insert);
        assert!(matches!(err, ApiError::Unavailable));
        assert_eq!(err.to_string(), "Database connection error");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = ApiError::store(StoreError::Io(io), ApiError::Insert);
        assert_eq!(err.to_string(), "Database insert error");
    }

    #[test]
    fn test_malformed_message_is_generic() {
        let malformed = serde_json::from_str::<shared::ScoreSubmission>("not json").unwrap_err();
        assert_eq!(
            ApiError::Malformed(malformed).to_string(),
            "Invalid score submission"
        );
    }

    #[test]
    fn test_validation_reason_is_not_exposed() {
        let err = ApiError::Invalid(ValidationError::Name);
        assert_eq!(err.to_string(), "Invalid score submission");
        assert!(std::error::Error::source(&err).is_some());
    }
}
