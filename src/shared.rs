use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, BackendClient, HttpBackendClient};
use crate::chat::SendError;
use crate::config::AppConfig;
use crate::room::RoomRegistry;
use crate::session::{SessionOptions, SessionRegistry};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub rooms: RoomRegistry,
    pub sessions: SessionRegistry,
    pub backend: Arc<dyn BackendClient>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn BackendClient>) -> Self {
        let sessions = SessionRegistry::new(SessionOptions::from(&config));
        Self {
            config: Arc::new(config),
            rooms: RoomRegistry::new(),
            sessions,
            backend,
        }
    }

    /// State wired to the real backend named in `config`
    pub fn from_config(config: AppConfig) -> Self {
        let backend = Arc::new(HttpBackendClient::new(config.backend_base_url.clone()));
        Self::new(config, backend)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    SendFailed(#[from] SendError),

    #[error("{0}")]
    Backend(#[from] ApiError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::SendFailed(e @ SendError::Unmounted) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            AppError::SendFailed(e) => {
                // The client keeps the typed text and offers a retry
                let body = Json(json!({
                    "error": e.to_string(),
                    "retryable": true
                }));
                return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
            }
            AppError::Backend(ApiError::Status(status)) if status.as_u16() == 404 => (
                StatusCode::NOT_FOUND,
                "Not found in backend".to_string(),
            ),
            AppError::Backend(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
