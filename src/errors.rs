use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unique error codes for client identification
#[derive(Debug, Clone, Copy)]
pub enum ErrorCode {
    // Catalog errors (1xxx)
    CatalogLoad = 1001,

    // Validation errors (2xxx)
    ValidationFailed = 2001,

    // External service errors (5xxx)
    IndexUnavailable = 5001,
    EmbeddingServiceError = 5002,
    GenerationFailed = 5003,

    // Internal errors (9xxx)
    InternalError = 9001,
    ConfigurationError = 9002,
}

impl ErrorCode {
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Error taxonomy of the analysis pipeline.
///
/// Ingestion failures are reported and re-triggerable, never fatal to the
/// process; analysis failures propagate to the handler as a whole — an
/// analysis either fully succeeds or fully fails.
#[derive(Error, Debug)]
pub enum AppError {
    // Catalog unreadable or malformed; ingestion aborts with nothing written
    #[error("Failed to load catalog: {0}")]
    LoadError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // Semantic index query or upsert failed
    #[error("Semantic index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Embedding service error: {0}")]
    EmbeddingError(String),

    // Language model call failed or timed out; no partial narrative exists
    #[error("Report generation failed: {0}")]
    GenerationFailure(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::LoadError(_) => ErrorCode::CatalogLoad,
            Self::ValidationError(_) => ErrorCode::ValidationFailed,
            Self::IndexUnavailable(_) => ErrorCode::IndexUnavailable,
            Self::EmbeddingError(_) => ErrorCode::EmbeddingServiceError,
            Self::GenerationFailure(_) => ErrorCode::GenerationFailed,
            Self::InternalError(_) => ErrorCode::InternalError,
            Self::ConfigError(_) => ErrorCode::ConfigurationError,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::LoadError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::EmbeddingError(_) => StatusCode::BAD_GATEWAY,
            Self::GenerationFailure(_) => StatusCode::BAD_GATEWAY,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Log based on severity
        match &self {
            AppError::ValidationError(_) => {
                tracing::debug!(error_code = error_code.as_u16(), %message, "Client error");
            }
            _ => {
                tracing::error!(error_code = error_code.as_u16(), %message, error = ?self, "Server error");
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code.as_u16(),
                "status": status.as_u16(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
