// Room event plumbing
//
// A room delivers `RoomEvent`s; `RoomSubscription` ties one room to one
// `RoomEventHandler` for as long as its guard is held.

// Public API - what other modules can use
pub use events::RoomEvent;
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_subscription::{RoomSubscription, SubscriptionGuard};

// Internal modules
mod events;
mod room_handler;
mod room_subscription;
