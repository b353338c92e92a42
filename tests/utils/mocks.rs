use async_trait::async_trait;
use std::sync::Mutex;

use standin::api::{ApiError, BackendClient, Document, MeetingDetails, Project};
use standin::notify::{Notification, Notifier};

// ============================================================================
// Mock Infrastructure
// ============================================================================

#[derive(Default)]
pub struct CollectingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Backend that knows nothing; every lookup answers 404
pub struct StaticBackend;

fn not_found() -> ApiError {
    ApiError::Status(reqwest::StatusCode::NOT_FOUND)
}

#[async_trait]
impl BackendClient for StaticBackend {
    async fn get_meeting(&self, _meeting_id: &str) -> Result<MeetingDetails, ApiError> {
        Err(not_found())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_project_documents(&self, _project_id: i64) -> Result<Vec<Document>, ApiError> {
        Err(not_found())
    }
}
