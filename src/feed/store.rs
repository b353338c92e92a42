use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::debug;

use super::messages::KnowledgeMessage;

/// Append-only, arrival-ordered list of knowledge messages
///
/// Receipt timestamps never go backwards: an entry stamped earlier than its
/// predecessor (wall clock adjustment) is clamped to the predecessor's time.
/// With a capacity set, the oldest entries are evicted first.
#[derive(Debug, Default)]
pub struct KnowledgeFeed {
    inner: RwLock<FeedInner>,
    capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct FeedInner {
    entries: VecDeque<KnowledgeMessage>,
    last_ts: i64,
}

impl KnowledgeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: RwLock::default(),
            capacity,
        }
    }

    /// Appends a message and returns it as stored
    pub async fn append(&self, mut message: KnowledgeMessage) -> KnowledgeMessage {
        let mut inner = self.inner.write().await;

        message.ts = message.ts.max(inner.last_ts);
        inner.last_ts = message.ts;
        inner.entries.push_back(message.clone());

        if let Some(capacity) = self.capacity {
            while inner.entries.len() > capacity {
                inner.entries.pop_front();
                debug!(capacity = capacity, "Evicted oldest knowledge message");
            }
        }

        message
    }

    pub async fn entries(&self) -> Vec<KnowledgeMessage> {
        self.inner.read().await.entries.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
