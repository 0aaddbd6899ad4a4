//! Server core functionality
//!
//! This module contains the listener, HTTP routes, configuration and the
//! keepalive task.

pub mod config;
pub mod core;
pub mod keepalive;
pub mod routes;

pub use self::config::ServerConfig;
pub use self::core::Server;
