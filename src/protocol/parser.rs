//! Frame parsing
//!
//! Classifies inbound WebSocket frames for the per-client read loop.

use axum::extract::ws::Message;

use crate::error::SessionError;
use crate::protocol::location::Location;

/// What the read loop should do with one inbound frame.
#[derive(Debug, PartialEq)]
pub enum Inbound {
    /// A decoded location report.
    Update(Location),
    /// Ping/pong traffic; answered by the transport.
    Control,
    /// The peer sent a close frame.
    Close,
}

/// Parses a frame into an [`Inbound`] action.
///
/// Text and binary frames both carry the JSON document. Any decode failure
/// ends the session.
pub fn parse_frame(message: Message) -> Result<Inbound, SessionError> {
    match message {
        Message::Text(text) => Ok(Inbound::Update(Location::decode(text.as_str())?)),
        Message::Binary(data) => {
            let text = std::str::from_utf8(&data).map_err(|_| SessionError::InvalidEncoding)?;
            Ok(Inbound::Update(Location::decode(text)?))
        }
        Message::Ping(_) | Message::Pong(_) => Ok(Inbound::Control),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
