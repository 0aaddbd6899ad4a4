//! Location wire protocol
//!
//! Handles decoding of client location reports and encoding of the
//! aggregate snapshot pushed back to every client.

pub mod location;
pub mod parser;
pub mod responses;

pub use location::{Location, LocationSnapshot};
pub use parser::{Inbound, parse_frame};
pub use responses::{encode_snapshot, snapshot_message};
