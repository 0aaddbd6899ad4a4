//! Connection handles
//!
//! Every connection gets one bounded outbound queue drained by a single writer
//! task, so broadcast passes from any number of tasks never write to the
//! socket concurrently. The registry stores the sending side.

use axum::extract::ws::Message;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Cloneable sending side of a connection's outbound queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: mpsc::Sender<Message>,
    dropped_messages: Arc<AtomicU64>,
}

impl ConnectionHandle {
    /// Creates a handle holding at most `capacity` undelivered frames, and the
    /// receiver its writer task drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = Self {
            tx,
            dropped_messages: Arc::new(AtomicU64::new(0)),
        };
        (handle, rx)
    }

    /// Queues a message for the writer task without waiting.
    ///
    /// Returns `false` if the queue is full or the writer has stopped, and
    /// counts the dropped message.
    pub fn deliver(&self, message: Message) -> bool {
        if self.tx.try_send(message).is_ok() {
            true
        } else {
            self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Returns whether the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Total messages dropped for this connection.
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Returns whether both handles feed the same connection.
    pub fn same_connection(&self, other: &ConnectionHandle) -> bool {
        self.tx.same_channel(&other.tx)
    }
}
