//! Error types for the Local Library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    StoreFailure = 2,
    NoSuchDocument = 3,
    Unsupported = 4,
}

/// Main application error type.
///
/// Validation failures are not errors: services report them as
/// [`crate::services::FormOutcome::Invalid`] so the form can be redisplayed.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchDocument, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Document (de)serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreFailure,
                    "Malformed document".to_string(),
                )
            }
            AppError::Unsupported(msg) => {
                (StatusCode::NOT_IMPLEMENTED, ErrorCode::Unsupported, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("Book x not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_codes_are_sequential() {
        let codes = [
            ErrorCode::Failure,
            ErrorCode::StoreFailure,
            ErrorCode::NoSuchDocument,
            ErrorCode::Unsupported,
        ];
        let numbers: Vec<u32> = codes.iter().map(|code| *code as u32).collect();
        assert_eq!(numbers, [1, 2, 3, 4]);
    }

    #[test]
    fn unsupported_maps_to_501() {
        let response = AppError::Unsupported("Author update".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
