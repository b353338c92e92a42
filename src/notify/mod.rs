//! Host-level alert surface.
//!
//! Anything that needs to tell the user something went wrong goes through a
//! [`Notifier`]; how the alert is shown is up to the client.

use serde::{Deserialize, Serialize};

/// A transient, user-facing alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
