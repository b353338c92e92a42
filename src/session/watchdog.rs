use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

use super::agent::AgentState;
use crate::notify::{Notification, Notifier};
use crate::room::Room;

/// Default time the agent gets to become available after session start
pub const AGENT_READY_TIMEOUT: Duration = Duration::from_secs(20);

/// How a watchdog run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogOutcome {
    /// The agent became available before the deadline
    AgentReady,
    /// The deadline passed with the agent unavailable; the room was disconnected
    TimedOut { state: AgentState },
    /// The room went away first, either closed or already disconnected
    RoomClosed,
}

/// Deadline on the agent becoming available
///
/// The timer restarts from zero on every agent state change. An agent that
/// reaches `initializing` late therefore gets a full timeout from that point.
pub struct AvailabilityWatchdog;

impl AvailabilityWatchdog {
    pub fn spawn(
        room: Arc<dyn Room>,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> WatchdogHandle {
        let mut states = room.watch_agent_state();

        info!(
            room_id = %room.room_id(),
            timeout_secs = timeout.as_secs(),
            "Starting agent availability watchdog"
        );

        let handle = tokio::spawn(async move {
            let expired = sleep_until(Instant::now() + timeout);
            tokio::pin!(expired);

            loop {
                let state = *states.borrow_and_update();
                if state.is_available() {
                    info!(room_id = %room.room_id(), state = %state, "Agent available");
                    return WatchdogOutcome::AgentReady;
                }

                tokio::select! {
                    _ = &mut expired => break,
                    changed = states.changed() => {
                        if changed.is_err() {
                            return WatchdogOutcome::RoomClosed;
                        }
                        expired.as_mut().reset(Instant::now() + timeout);
                    }
                }
            }

            let state = room.agent_state();
            if state.is_available() {
                return WatchdogOutcome::AgentReady;
            }
            if !room.is_connected() {
                info!(room_id = %room.room_id(), "Room already disconnected, watchdog idle");
                return WatchdogOutcome::RoomClosed;
            }

            warn!(
                room_id = %room.room_id(),
                state = %state,
                "Agent not available before deadline, ending session"
            );
            notifier.notify(Notification::new(
                "Session ended",
                unavailable_reason(state),
            ));
            room.disconnect().await;

            WatchdogOutcome::TimedOut { state }
        });

        WatchdogHandle { handle }
    }
}

/// User-facing explanation for an agent that never became available
pub fn unavailable_reason(state: AgentState) -> &'static str {
    match state {
        AgentState::Connecting => "Agent did not join the room.",
        _ => "Agent connected but did not complete initializing.",
    }
}

/// Running watchdog; dropping it clears the timer
#[derive(Debug)]
pub struct WatchdogHandle {
    handle: JoinHandle<WatchdogOutcome>,
}

impl WatchdogHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the run to end; `None` if it was cancelled
    pub async fn outcome(mut self) -> Option<WatchdogOutcome> {
        (&mut self.handle).await.ok()
    }

    /// Explicit cancel, same as dropping the handle
    pub fn cancel(self) {}
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
