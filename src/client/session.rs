//! Client identity
//!
//! Derives the identifier a connection is registered under.

use serde::Deserialize;
use std::net::SocketAddr;
use uuid::Uuid;

/// How a new connection's client identifier is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientIdMode {
    /// The peer's `host:port`. Reconnecting from a new port yields a new id;
    /// two clients behind the same observed address collide.
    #[default]
    PeerAddr,
    /// A fresh UUID per connection.
    Session,
}

impl ClientIdMode {
    /// Returns the identifier for a connection from `peer`.
    pub fn client_id(&self, peer: SocketAddr) -> String {
        match self {
            ClientIdMode::PeerAddr => peer.to_string(),
            ClientIdMode::Session => Uuid::new_v4().to_string(),
        }
    }
}
