use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::engine::MatchError;

/// Fatal configuration problems. Raised while loading the vocabulary, the
/// weights or the embedding backend, and when a capability hands back vectors
/// of the wrong dimensionality.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("alias '{alias}' of skill '{canonical}' is empty after normalization")]
    EmptyAlias { alias: String, canonical: String },

    #[error("skill vocabulary contains an empty canonical id")]
    EmptyCanonical,

    #[error("skill vocabulary is empty")]
    EmptyVocabulary,

    #[error("invalid score weights: {0}")]
    InvalidWeights(String),

    #[error("invalid embedding configuration: {0}")]
    Embedding(String),

    #[error("embedding dimensionality mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to read skill vocabulary: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse skill vocabulary: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Configuration(e) => AppError::Configuration(e),
            MatchError::RoleMismatch { .. } => AppError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration(e) => {
                tracing::error!("Configuration error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The matching engine is misconfigured".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
