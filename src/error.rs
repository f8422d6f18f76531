//! Error types for the provider boundary, the token file and the service.
//!
//! [`AppError`] is what every operation of the service returns. It converts
//! into an HTTP response with a JSON `{ "error": ... }` body and a status code
//! chosen by kind, so callers can rely on the status alone.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failure of a call to the Spotify API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Spotify API responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to send http request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Invalid request url {0}")]
    InvalidUrl(String),
}

/// Failure reading or writing the token file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Token file {path} not found. Run `songlist auth` first.")]
    NotFound { path: String },
    #[error("Token file io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Token file is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("Cannot load environment: {0}")]
    Env(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error(transparent)]
    Upstream(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
