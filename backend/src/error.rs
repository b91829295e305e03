//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Agent name is not one of the registered agents
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Translate was requested without an uploaded document
    #[error("No file provided")]
    NoFileProvided,

    /// The document has no non-blank paragraphs to translate
    #[error("Document contains no text to translate")]
    EmptyDocument,

    /// The uploaded bytes could not be read as a Word document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The translation service failed; the whole run is discarded
    #[error("Translation service failure: {0}")]
    TranslationServiceFailure(String),

    /// Target language is not in the supported table
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Request was malformed (bad multipart field, bad query, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::document::DocumentError> for AppError {
    fn from(err: crate::document::DocumentError) -> Self {
        AppError::InvalidDocument(err.to_string())
    }
}

impl AppError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownAgent(_) => StatusCode::NOT_FOUND,
            AppError::NoFileProvided => StatusCode::BAD_REQUEST,
            AppError::EmptyDocument => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TranslationServiceFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::UnknownAgent("Nobody".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NoFileProvided.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::EmptyDocument.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::TranslationServiceFailure("boom".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_messages_are_user_visible() {
        assert_eq!(AppError::NoFileProvided.to_string(), "No file provided");
        assert_eq!(
            AppError::UnknownAgent("Watcher".to_string()).to_string(),
            "Unknown agent: Watcher"
        );
    }
}
