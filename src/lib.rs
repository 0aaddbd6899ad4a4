pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod utils;

pub use client::Registry;
pub use protocol::Location;
pub use server::{Server, ServerConfig};
