// Client for the backend API that owns meetings, projects and documents

// Public API - what other modules can use
pub use client::{ApiError, BackendClient, HttpBackendClient};
pub use handlers::{get_meeting, list_project_documents, list_projects};
pub use models::{
    attendee_display_name, attendee_initials, duration_label, filter_projects, Attendee,
    Document, MeetingDetails, MeetingInfo, Project,
};

// Internal modules
mod client;
mod handlers;
mod models;
