use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::Registry;
use crate::error::RelayError;
use crate::server::config::ServerConfig;
use crate::server::routes::{RelayState, build_router};

pub struct Server {
    registry: Arc<Registry>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listener. Port 0 picks an ephemeral port; see [`Server::local_addr`].
    pub async fn new(config: ServerConfig) -> Result<Self, RelayError> {
        let socket = config.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            registry: Arc::new(Registry::new()),
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared registry handed to every connection task.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Serves connections until the listener fails. Each accepted connection
    /// runs on its own task.
    pub async fn start(self) -> Result<(), RelayError> {
        info!(
            "Accepting location clients on ws://{}{}",
            self.config.listen_socket(),
            self.config.ws_path
        );

        let app = build_router(RelayState {
            registry: self.registry,
            config: self.config,
        });

        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
