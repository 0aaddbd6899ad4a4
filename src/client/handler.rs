use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tokio::time::timeout;

use crate::client::broadcast::notify;
use crate::client::handle::ConnectionHandle;
use crate::client::registry::Registry;
use crate::error::SessionError;
use crate::error::handlers::handle_session_error;
use crate::protocol::{Inbound, parse_frame};
use crate::server::config::ServerConfig;

/// How long a closing connection may spend flushing queued frames.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Handles one upgraded client connection until it closes.
///
/// - Registers the client and spawns its single writer task.
/// - Reads location reports until the peer leaves or sends garbage.
/// - Releases the registry entry and broadcasts the departure.
/// - Gives the writer a bounded window to flush, then stops it.
pub async fn handle_client(
    socket: WebSocket,
    peer: SocketAddr,
    registry: Arc<Registry>,
    config: Arc<ServerConfig>,
) {
    let client_id = config.client_id_mode.client_id(peer);
    let (sink, mut source) = socket.split();
    let (handle, rx) = ConnectionHandle::channel(config.outbound_queue_capacity);

    if registry.register(&client_id, handle.clone()).await.is_some() {
        warn!("Client {} reconnected; previous session orphaned", client_id);
    }
    info!("Client {} connected from {}", client_id, peer);

    let mut writer = tokio::spawn(writer_task(sink, rx));

    if let Err(e) = read_loop(&mut source, &client_id, &registry).await {
        handle_session_error(&client_id, &e);
    }

    registry.release(&client_id, &handle).await;
    let dropped = handle.drop_count();
    drop(handle);
    notify(&registry).await;

    if timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await.is_err() {
        writer.abort();
    }

    info!(
        "Client {} disconnected ({} snapshots dropped)",
        client_id, dropped
    );
}

/// Applies location reports in arrival order until the session ends.
async fn read_loop(
    source: &mut SplitStream<WebSocket>,
    client_id: &str,
    registry: &Registry,
) -> Result<(), SessionError> {
    while let Some(frame) = source.next().await {
        match parse_frame(frame?)? {
            Inbound::Update(location) => {
                debug!("Location from {}: {:?}", client_id, location);
                registry.update_location(client_id, location).await;
                notify(registry).await;
            }
            Inbound::Control => {}
            Inbound::Close => {
                debug!("Client {} sent close", client_id);
                break;
            }
        }
    }
    Ok(())
}

/// Owns the socket's write half; the only place frames are sent.
async fn writer_task(mut sink: SplitSink<WebSocket, Message>, mut rx: Receiver<Message>) {
    while let Some(message) = rx.recv().await {
        if let Err(e) = sink.send(message).await {
            debug!("Write failed, stopping writer: {}", e);
            return;
        }
    }
    let _ = sink.close().await;
}
