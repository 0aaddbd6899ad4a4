//! Configuration management for the location relay
//!
//! Values come from built-in defaults, then an optional `config.toml` in the
//! working directory, then `LOC_RELAY_*` environment variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

use crate::client::ClientIdMode;

const CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "LOC_RELAY";

/// Server configuration. Every change requires a restart.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind the listener
    /// Environment: LOC_RELAY_BIND_ADDRESS
    pub bind_address: String,

    /// Listener port
    /// Environment: LOC_RELAY_PORT
    pub port: u16,

    /// Request path that accepts the WebSocket upgrade
    pub ws_path: String,

    /// How connections are keyed in the registry
    pub client_id_mode: ClientIdMode,

    /// URL fetched periodically to keep the host awake; unset disables it
    pub keepalive_url: Option<String>,

    pub keepalive_interval_secs: u64,

    /// Snapshots that may wait for one slow client before further ones are dropped
    pub outbound_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            ws_path: "/ws".to_string(),
            client_id_mode: ClientIdMode::PeerAddr,
            keepalive_url: None,
            keepalive_interval_secs: 10,
            outbound_queue_capacity: 32,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    /// Load configuration from a TOML document, on top of the defaults
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if !self.ws_path.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "ws_path must start with '/', got {:?}",
                self.ws_path
            )));
        }

        if self.ws_path.contains(['{', '}', '*']) {
            return Err(ConfigError::Message(format!(
                "ws_path must be a literal path, got {:?}",
                self.ws_path
            )));
        }

        if self.outbound_queue_capacity == 0 {
            return Err(ConfigError::Message(
                "outbound_queue_capacity must be greater than 0".into(),
            ));
        }

        if self.keepalive_interval_secs == 0 {
            return Err(ConfigError::Message(
                "keepalive_interval_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Keepalive target, if one is configured
    pub fn keepalive_url(&self) -> Option<&str> {
        self.keepalive_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.listen_socket(), "0.0.0.0:8080");
        assert_eq!(config.ws_path, "/ws");
        assert_eq!(config.client_id_mode, ClientIdMode::PeerAddr);
        assert_eq!(config.keepalive_url(), None);
        assert_eq!(config.keepalive_interval(), Duration::from_secs(10));
        assert_eq!(config.outbound_queue_capacity, 32);
    }

    #[test]
    fn overrides_apply() {
        let config = ServerConfig::from_toml(
            r#"
            bind_address = "127.0.0.1"
            port = 9000
            ws_path = "/live"
            client_id_mode = "session"
            keepalive_url = "https://example.com/ping"
            keepalive_interval_secs = 30
            outbound_queue_capacity = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_socket(), "127.0.0.1:9000");
        assert_eq!(config.ws_path, "/live");
        assert_eq!(config.client_id_mode, ClientIdMode::Session);
        assert_eq!(config.keepalive_url(), Some("https://example.com/ping"));
        assert_eq!(config.keepalive_interval(), Duration::from_secs(30));
        assert_eq!(config.outbound_queue_capacity, 4);
    }

    #[test]
    fn blank_keepalive_url_is_disabled() {
        let config = ServerConfig::from_toml(r#"keepalive_url = "  ""#).unwrap();
        assert_eq!(config.keepalive_url(), None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ServerConfig::from_toml(r#"ws_path = "ws""#).is_err());
        assert!(ServerConfig::from_toml(r#"ws_path = "/{room}""#).is_err());
        assert!(ServerConfig::from_toml("keepalive_interval_secs = 0").is_err());
        assert!(ServerConfig::from_toml("outbound_queue_capacity = 0").is_err());
        assert!(ServerConfig::from_toml(r#"bind_address = """#).is_err());
        assert!(ServerConfig::from_toml(r#"client_id_mode = "cookie""#).is_err());
    }
}
