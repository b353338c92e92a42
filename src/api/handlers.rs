use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, instrument};

use super::models::{filter_projects, Document, MeetingInfo, Project};
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct ProjectSearch {
    #[serde(default)]
    pub search: Option<String>,
}

/// HTTP handler for the meeting-info panel
///
/// GET /meetings/{meeting_id}
#[instrument(name = "get_meeting", skip(state))]
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<MeetingInfo>, AppError> {
    let details = state.backend.get_meeting(&meeting_id).await?;
    info!(meeting_id = %meeting_id, title = %details.title, "Meeting details fetched");
    Ok(Json(MeetingInfo::from(details)))
}

/// GET /projects?search=...
#[instrument(name = "list_projects", skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectSearch>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.backend.list_projects().await?;
    let projects = match query.search {
        Some(search) => filter_projects(projects, &search),
        None => projects,
    };

    info!(project_count = projects.len(), "Projects listed");
    Ok(Json(projects))
}

/// GET /projects/{project_id}/documents
#[instrument(name = "list_project_documents", skip(state))]
pub async fn list_project_documents(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = state.backend.list_project_documents(project_id).await?;
    Ok(Json(documents))
}
