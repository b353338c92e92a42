use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::models::{Document, MeetingDetails, Project};

/// Errors from calls to the backend API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend responded with status {0}")]
    Status(StatusCode),
}

/// The backend service that owns meetings, projects and documents
///
/// Responses are taken as they come: no retry, no backoff.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn get_meeting(&self, meeting_id: &str) -> Result<MeetingDetails, ApiError>;

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn list_project_documents(&self, project_id: i64) -> Result<Vec<Document>, ApiError>;
}

pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Backend GET");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "Backend returned non-OK status");
            return Err(ApiError::Status(status));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    #[instrument(skip(self))]
    async fn get_meeting(&self, meeting_id: &str) -> Result<MeetingDetails, ApiError> {
        self.get_json(&format!("/meeting/{meeting_id}")).await
    }

    #[instrument(skip(self))]
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/project").await
    }

    #[instrument(skip(self))]
    async fn list_project_documents(&self, project_id: i64) -> Result<Vec<Document>, ApiError> {
        self.get_json(&format!("/project/{project_id}/documents"))
            .await
    }
}
