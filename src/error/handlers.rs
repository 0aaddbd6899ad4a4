//! Error handlers
//!
//! Logs errors at the level their category calls for. Nothing here propagates:
//! every failure is observability-only.

use log::{debug, error, warn};

use crate::error::types::{BroadcastError, SessionError};

/// Log the error that ended a client's session.
///
/// A peer hanging up is routine, so transport errors only show at debug.
pub fn handle_session_error(client_id: &str, err: &SessionError) {
    match err {
        SessionError::Transport(e) => debug!("Connection to {} dropped: {}", client_id, e),
        _ => warn!("Session {} ended: {}", client_id, err),
    }
}

/// Log a failure raised during a broadcast pass.
pub fn handle_broadcast_error(err: &BroadcastError) {
    match err {
        BroadcastError::Serialize(_) => error!("Broadcast aborted: {}", err),
        BroadcastError::Delivery { .. } => warn!("{}", err),
    }
}
