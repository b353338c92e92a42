use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::updates::ViewUpdates;
use super::view::{SessionOptions, SessionView};
use crate::room::Room;

/// Mounted session views, one per room
#[derive(Clone, Default)]
pub struct SessionRegistry {
    views: Arc<RwLock<HashMap<String, Arc<SessionView>>>>,
    options: SessionOptions,
}

impl SessionRegistry {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            views: Arc::new(RwLock::new(HashMap::new())),
            options,
        }
    }

    /// Returns the view mounted on `room`, mounting one if there is none
    pub async fn mount(&self, room: Arc<dyn Room>) -> Arc<SessionView> {
        let room_id = room.room_id().to_string();
        if let Some(view) = self.views.read().await.get(&room_id) {
            return Arc::clone(view);
        }

        let mut views = self.views.write().await;
        let view = views.entry(room_id).or_insert_with(|| {
            debug!(room_id = %room.room_id(), "Mounting new session view");
            let updates = ViewUpdates::new();
            let notifier = Arc::new(updates.clone());
            Arc::new(SessionView::mount(
                room,
                self.options.clone(),
                updates,
                notifier,
            ))
        });
        Arc::clone(view)
    }

    pub async fn get(&self, room_id: &str) -> Option<Arc<SessionView>> {
        self.views.read().await.get(room_id).cloned()
    }

    /// Unmounts and forgets the view of `room_id`; false if none was mounted
    pub async fn unmount(&self, room_id: &str) -> bool {
        let view = self.views.write().await.remove(room_id);
        match view {
            Some(view) => {
                view.unmount().await;
                true
            }
            None => false,
        }
    }
}
