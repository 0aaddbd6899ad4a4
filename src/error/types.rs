//! Error types
//!
//! Defines domain-specific error types for the server, the per-client session
//! and the broadcast pass.

use std::fmt;
use std::io;

/// Errors that end a single client's session.
#[derive(Debug)]
pub enum SessionError {
    Transport(axum::Error),
    Decode(serde_json::Error),
    InvalidEncoding,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Transport(e) => write!(f, "Transport error: {}", e),
            SessionError::Decode(e) => write!(f, "Malformed location message: {}", e),
            SessionError::InvalidEncoding => write!(f, "Binary frame is not valid UTF-8"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<serde_json::Error> for SessionError {
    fn from(error: serde_json::Error) -> Self {
        SessionError::Decode(error)
    }
}

impl From<axum::Error> for SessionError {
    fn from(error: axum::Error) -> Self {
        SessionError::Transport(error)
    }
}

/// Errors raised while fanning out a snapshot.
#[derive(Debug)]
pub enum BroadcastError {
    Serialize(serde_json::Error),
    Delivery {
        client_id: String,
        reason: &'static str,
    },
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastError::Serialize(e) => write!(f, "Failed to encode locations: {}", e),
            BroadcastError::Delivery { client_id, reason } => {
                write!(f, "Failed to deliver snapshot to {}: {}", client_id, reason)
            }
        }
    }
}

impl std::error::Error for BroadcastError {}

impl From<serde_json::Error> for BroadcastError {
    fn from(error: serde_json::Error) -> Self {
        BroadcastError::Serialize(error)
    }
}

/// Process-level errors: configuration and listener setup.
#[derive(Debug)]
pub enum RelayError {
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Config(e) => write!(f, "Configuration error: {}", e),
            RelayError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<config::ConfigError> for RelayError {
    fn from(error: config::ConfigError) -> Self {
        RelayError::Config(error)
    }
}

impl From<io::Error> for RelayError {
    fn from(error: io::Error) -> Self {
        RelayError::IoError(error)
    }
}
