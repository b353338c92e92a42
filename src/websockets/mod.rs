// Public API
pub use handler::{websocket_handler, ViewMessageHandler};
pub use messages::{ChatPayload, ClientMessage, ClientMessageType};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod handler;
mod messages;
mod socket;
