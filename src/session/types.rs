use serde::{Deserialize, Serialize};

/// Request payload for sending a chat line from the view
#[derive(Debug, Deserialize)]
pub struct SendChatRequest {
    pub message: String,
}

/// Response for starting a session
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    /// False when the session had already been started
    pub started: bool,
    pub snapshot: super::view::ViewSnapshot,
}
