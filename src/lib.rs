// Library crate for the StandIn meeting-room service
// This file exposes the public API for the binary and integration tests

pub mod api;
pub mod chat;
pub mod config;
pub mod event;
pub mod feed;
pub mod notify;
pub mod presentation;
pub mod room;
pub mod routes;
pub mod session;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use event::{RoomEvent, RoomSubscription};
pub use room::{LocalRoom, Room, RoomRegistry};
pub use routes::build_router;
pub use session::{SessionRegistry, SessionView, ViewUpdate};
pub use shared::{AppError, AppState};
