//! Broadcast pass
//!
//! Encodes the full location map once and queues it on every registered
//! connection. Runs under the registry lock, so a pass sees one consistent
//! state and blocks other registry operations until it finishes.

use log::debug;

use crate::client::registry::Registry;
use crate::error::BroadcastError;
use crate::error::handlers::handle_broadcast_error;
use crate::protocol::snapshot_message;

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the snapshot was offered to.
    pub recipients: usize,
    /// Connections whose writer had already stopped.
    pub failed: usize,
}

/// Pushes the current location snapshot to every registered connection.
///
/// Delivery never waits on a socket. A closed or full queue counts as a
/// delivery failure: it is logged and skipped, and the client stays
/// registered until its own read loop notices. An encoding failure aborts the
/// pass before anything is sent.
pub async fn broadcast(registry: &Registry) -> Result<BroadcastReport, BroadcastError> {
    let state = registry.lock().await;
    let message = snapshot_message(&state.locations)?;

    let mut report = BroadcastReport::default();
    for (id, handle) in state.connections.iter() {
        report.recipients += 1;
        if !handle.deliver(message.clone()) {
            report.failed += 1;
            let reason = if handle.is_closed() {
                "connection closed"
            } else {
                "outbound queue full"
            };
            handle_broadcast_error(&BroadcastError::Delivery {
                client_id: id.clone(),
                reason,
            });
        }
    }

    debug!(
        "Broadcast {} locations to {} clients ({} failed)",
        state.locations.len(),
        report.recipients,
        report.failed
    );
    Ok(report)
}

/// Runs a broadcast pass for a triggering event, logging any failure.
pub async fn notify(registry: &Registry) {
    if let Err(e) = broadcast(registry).await {
        handle_broadcast_error(&e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ConnectionHandle;
    use crate::protocol::{Location, LocationSnapshot};
    use axum::extract::ws::Message;
    use tokio::sync::mpsc::Receiver;

    fn decode(rx: &mut Receiver<Message>) -> LocationSnapshot {
        match rx.try_recv().expect("no snapshot queued") {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[tokio::test]
    async fn every_connection_gets_the_full_snapshot() {
        let registry = Registry::new();
        let (a, mut rx_a) = ConnectionHandle::channel(8);
        let (b, mut rx_b) = ConnectionHandle::channel(8);
        registry.register("a", a).await;
        registry.register("b", b).await;
        registry
            .update_location("b", Location { name: "Bo".into(), ..Location::default() })
            .await;

        let report = broadcast(&registry).await.unwrap();

        assert_eq!(report, BroadcastReport { recipients: 2, failed: 0 });
        let seen_by_a = decode(&mut rx_a);
        assert_eq!(seen_by_a, decode(&mut rx_b));
        assert_eq!(seen_by_a.len(), 1);
        assert_eq!(seen_by_a["b"].name, "Bo");
    }

    #[tokio::test]
    async fn dead_recipient_does_not_stop_the_pass() {
        let registry = Registry::new();
        let (dead, dead_rx) = ConnectionHandle::channel(8);
        let (live, mut live_rx) = ConnectionHandle::channel(8);
        registry.register("dead", dead).await;
        registry.register("live", live).await;
        drop(dead_rx);

        let report = broadcast(&registry).await.unwrap();

        assert_eq!(report, BroadcastReport { recipients: 2, failed: 1 });
        assert!(decode(&mut live_rx).is_empty());
        assert!(registry.is_registered("dead").await);
    }

    #[tokio::test]
    async fn departure_is_omitted_from_next_pass() {
        let registry = Registry::new();
        let (a, _rx_a) = ConnectionHandle::channel(8);
        let (b, mut rx_b) = ConnectionHandle::channel(8);
        registry.register("a", a.clone()).await;
        registry.register("b", b).await;
        registry.update_location("a", Location::default()).await;
        registry.update_location("b", Location::default()).await;

        registry.release("a", &a).await;
        notify(&registry).await;

        let snapshot = decode(&mut rx_b);
        assert!(!snapshot.contains_key("a"));
        assert!(snapshot.contains_key("b"));
    }

    #[tokio::test]
    async fn empty_registry_sends_nothing() {
        let registry = Registry::new();
        assert_eq!(broadcast(&registry).await.unwrap(), BroadcastReport::default());
    }

    #[tokio::test]
    async fn stalled_reader_queue_stays_capped() {
        let registry = Registry::new();
        let (stalled, mut stalled_rx) = ConnectionHandle::channel(4);
        let (live, mut live_rx) = ConnectionHandle::channel(4);
        registry.register("stalled", stalled.clone()).await;
        registry.register("live", live).await;
        registry
            .update_location(
                "stalled",
                Location { status: "x".repeat(1024), ..Location::default() },
            )
            .await;

        let mut failed = 0;
        for _ in 0..100 {
            failed += broadcast(&registry).await.unwrap().failed;
            // The live client keeps up.
            decode(&mut live_rx);
        }

        assert_eq!(failed, 96);
        assert_eq!(stalled.drop_count(), 96);
        assert!(registry.is_registered("stalled").await);

        let mut queued = 0;
        while stalled_rx.try_recv().is_ok() {
            queued += 1;
        }
        assert_eq!(queued, 4);
    }
}
