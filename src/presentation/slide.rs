use serde::{Deserialize, Serialize};

/// The slide currently on screen
///
/// Defaults to an empty heading with no bullets until the first
/// presentation message arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl SlideContent {
    pub fn new(heading: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            bullets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heading.is_empty() && self.bullets.is_empty()
    }
}
