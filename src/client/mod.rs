//! Client management
//!
//! Tracks connected clients and their last reported locations, fans out
//! snapshots, and drives each connection's lifecycle.

pub mod broadcast;
pub mod handle;
pub mod handler;
pub mod registry;
pub mod session;

pub use broadcast::{BroadcastReport, broadcast, notify};
pub use handle::ConnectionHandle;
pub use handler::handle_client;
pub use registry::Registry;
pub use session::ClientIdMode;
