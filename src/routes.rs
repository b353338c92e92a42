use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{api, config, room, session, websockets};

/// Every HTTP and WebSocket route the service exposes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "StandIn meeting-room service" }))
        .route("/config", get(config::get_client_config))
        // Session views
        .route(
            "/rooms/:room_id/session",
            post(session::start_session)
                .get(session::get_session)
                .delete(session::end_session),
        )
        .route("/rooms/:room_id/feed", get(session::get_feed))
        .route("/rooms/:room_id/slide", get(session::get_slide))
        .route(
            "/rooms/:room_id/chat",
            get(session::get_chat).post(session::send_chat),
        )
        .route("/ws/:room_id", get(websockets::websocket_handler))
        // Room transport bridge
        .route("/bridge/rooms/:room_id/data", post(room::ingest_data))
        .route(
            "/bridge/rooms/:room_id/streams/:topic",
            post(room::ingest_text_stream),
        )
        .route(
            "/bridge/rooms/:room_id/agent-state",
            put(room::update_agent_state),
        )
        .route(
            "/bridge/rooms/:room_id/transcriptions",
            post(room::ingest_transcription),
        )
        .route("/bridge/rooms/:room_id/chat", post(room::ingest_chat))
        // Backend proxy
        .route("/meetings/:meeting_id", get(api::get_meeting))
        .route("/projects", get(api::list_projects))
        .route(
            "/projects/:project_id/documents",
            get(api::list_project_documents),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
