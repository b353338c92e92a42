use serde::{Deserialize, Serialize};

use crate::session::AgentState;

/// Response for every bridge route that injects a room event
#[derive(Debug, Serialize, Deserialize)]
pub struct BridgeAck {
    /// Number of listeners the event reached
    pub delivered: usize,
}

/// Request payload for reporting the agent's state
#[derive(Debug, Deserialize)]
pub struct AgentStateUpdate {
    pub state: AgentState,
}
