use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::local::LocalRoom;

/// Lookup table of the rooms this process is bridging
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, Arc<LocalRoom>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room with this id, creating it on first use
    pub async fn get_or_create(&self, room_id: &str) -> Arc<LocalRoom> {
        let rooms = self.rooms.read().await;
        if let Some(room) = rooms.get(room_id) {
            return Arc::clone(room);
        }
        drop(rooms);

        let mut rooms = self.rooms.write().await;
        // Another writer may have created it between the two locks
        let room = rooms.entry(room_id.to_string()).or_insert_with(|| {
            debug!(room_id = %room_id, "Creating new local room");
            Arc::new(LocalRoom::new(room_id))
        });
        Arc::clone(room)
    }

    pub async fn get(&self, room_id: &str) -> Option<Arc<LocalRoom>> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub async fn remove(&self, room_id: &str) -> Option<Arc<LocalRoom>> {
        self.rooms.write().await.remove(room_id)
    }
}
