use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Model call failed: {0}")]
    ModelCallFailed(String),

    #[error("Model response contained no usable text")]
    ModelResponseEmpty,

    #[error("Model returned empty output")]
    EmptyModelOutput,

    #[error("No JSON object found in model output; raw output: {excerpt}")]
    NoJsonFound { excerpt: String },

    #[error("Invalid JSON in model output: {detail}; raw output: {excerpt}")]
    InvalidJson { detail: String, excerpt: String },

    #[error("Quiz payload failed schema validation: {0}")]
    SchemaValidationFailed(String),

    #[error("Scrape failed: {0}")]
    ScrapeFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::ModelCallFailed(_) => "MODEL_CALL_FAILED",
            AppError::ModelResponseEmpty => "MODEL_RESPONSE_EMPTY",
            AppError::EmptyModelOutput => "EMPTY_MODEL_OUTPUT",
            AppError::NoJsonFound { .. } => "NO_JSON_FOUND",
            AppError::InvalidJson { .. } => "INVALID_JSON",
            AppError::SchemaValidationFailed(_) => "SCHEMA_VALIDATION_FAILED",
            AppError::ScrapeFailed(_) => "SCRAPE_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ScrapeFailed(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ModelCallFailed(_)
            | AppError::ModelResponseEmpty
            | AppError::EmptyModelOutput
            | AppError::NoJsonFound { .. }
            | AppError::InvalidJson { .. }
            | AppError::SchemaValidationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.error_code(),
            status: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::ModelCallFailed(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ScrapeFailed("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ModelCallFailed("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::SchemaValidationFailed("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes_are_distinguishable() {
        let errors = [
            AppError::ModelCallFailed("x".into()),
            AppError::ModelResponseEmpty,
            AppError::EmptyModelOutput,
            AppError::NoJsonFound { excerpt: "x".into() },
            AppError::InvalidJson {
                detail: "x".into(),
                excerpt: "y".into(),
            },
            AppError::SchemaValidationFailed("x".into()),
        ];

        let mut codes: Vec<&str> = errors.iter().map(|e| e.error_code()).collect();
        let original_len = codes.len();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), original_len);
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("quiz".into());
        assert_eq!(err.to_string(), "Not found: quiz");

        let err = AppError::InvalidJson {
            detail: "expected value at line 1".into(),
            excerpt: "not json".into(),
        };
        assert!(err.to_string().contains("not json"));
    }
}
