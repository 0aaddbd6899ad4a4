//! Location relay - Entry Point
//!
//! Clients report their position over a WebSocket and receive everyone's
//! latest position whenever anything changes.

use log::{error, info};

use loc_relay::server::keepalive::spawn_keepalive;
use loc_relay::utils::logging::setup_logging;
use loc_relay::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching location relay...");

    if let Some(url) = config.keepalive_url() {
        info!("Keepalive enabled: {} every {:?}", url, config.keepalive_interval());
        spawn_keepalive(url.to_string(), config.keepalive_interval());
    }

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = server.start() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
}
