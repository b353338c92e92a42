use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use standin::{build_router, AppConfig, AppState, LocalRoom, SessionView};

use super::mocks::StaticBackend;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub app: Router,
    pub room_id: String,
}

impl TestSetup {
    /// The room the bridge feeds, created on first use
    pub async fn room(&self) -> Arc<LocalRoom> {
        self.state.rooms.get_or_create(&self.room_id).await
    }

    /// Mounts and starts the session view of the test room
    pub async fn start_session(&self) -> Arc<SessionView> {
        let view = self.state.sessions.mount(self.room().await).await;
        view.start_session().await;
        view
    }
}

pub struct TestSetupBuilder {
    room_id: String,
    config: AppConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            room_id: "room-123".to_string(),
            config: AppConfig::default(),
        }
    }

    #[allow(dead_code)]
    pub fn with_room_id(mut self, room_id: &str) -> Self {
        self.room_id = room_id.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_agent_ready_timeout(mut self, timeout: Duration) -> Self {
        self.config.agent_ready_timeout = timeout;
        self
    }

    pub fn build(self) -> TestSetup {
        let state = AppState::new(self.config, Arc::new(StaticBackend));
        TestSetup {
            app: build_router(state.clone()),
            state,
            room_id: self.room_id,
        }
    }
}
