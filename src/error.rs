use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Client errors
    #[error("{0}")]
    BadRequest(String),
    #[error("Preferences not found for the given username")]
    PreferenceNotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,

    // Telemetry provider errors
    #[error("Telemetry request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Telemetry provider returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
    #[error("Telemetry response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    // Store errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Stored hidden devices are not valid JSON: {0}")]
    CorruptData(#[source] serde_json::Error),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// A missing preference on a non-username path is a server-side condition.
    pub fn not_found_as_internal(self) -> Self {
        match self {
            AppError::PreferenceNotFound => {
                AppError::Internal(anyhow::anyhow!("no preference record for requested user"))
            }
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // 400 Bad Request
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            // 404 Not Found
            AppError::PreferenceNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            // 405 Method Not Allowed
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),

            // 500 Internal Server Error
            AppError::Transport(_) | AppError::UpstreamStatus(_) | AppError::Decode(_) => {
                tracing::error!("Telemetry error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch data".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::CorruptData(e) => {
                tracing::error!("Corrupt preference data: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch user preferences".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
