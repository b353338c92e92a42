// Meeting session: agent availability and the mounted room view

// Public API - what other modules can use
pub use agent::AgentState;
pub use handlers::{
    end_session, get_chat, get_feed, get_session, get_slide, send_chat, start_session,
};
pub use registry::SessionRegistry;
pub use updates::{ViewUpdate, ViewUpdates};
pub use view::{SessionOptions, SessionView, ViewSnapshot};
pub use watchdog::{
    unavailable_reason, AvailabilityWatchdog, WatchdogHandle, WatchdogOutcome, AGENT_READY_TIMEOUT,
};

// Internal modules
mod agent;
mod handlers;
mod registry;
mod types;
mod updates;
mod view;
mod watchdog;
