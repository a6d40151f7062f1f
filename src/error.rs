use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;

/// Message shown to clients when the chat route fails for reasons the relay
/// did not report itself.
pub const UNEXPECTED_FAILURE: &str = "Failed to fetch response from ChatGPT";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Detail stays in the logs; clients only get the generic sentence.
        tracing::error!(error = %self, "request failed unexpectedly");
        response::failure(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_FAILURE)
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
