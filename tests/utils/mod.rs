pub mod actions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::{next_update, send_json, send_raw};
#[allow(unused_imports)]
pub use mocks::{CollectingNotifier, StaticBackend};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
