use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// State of the remote AI agent as reported by the room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentState {
    Disconnected,
    Connecting,
    Initializing,
    Listening,
    Thinking,
    Speaking,
}

impl AgentState {
    /// Whether the agent has finished joining and can take part
    pub fn is_available(self) -> bool {
        matches!(
            self,
            AgentState::Listening | AgentState::Thinking | AgentState::Speaking
        )
    }
}
