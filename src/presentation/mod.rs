// Public API - what other modules can use
pub use renderer::{PresentationAttachment, PresentationRenderer};
pub use slide::SlideContent;

// Internal modules
mod renderer;
mod slide;
