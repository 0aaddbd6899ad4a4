//! Error handling
//!
//! Defines error types and handling for the location relay.

pub mod handlers;
pub mod types;

pub use types::*;
