//! Client registry
//!
//! Single source of truth for who is connected and what each client last
//! reported. Both maps sit behind one lock so they always change together.

use log::debug;
use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

use crate::client::handle::ConnectionHandle;
use crate::protocol::{Location, LocationSnapshot};

/// The two maps guarded by the registry lock.
///
/// Every key in `locations` is also a key in `connections`.
#[derive(Default)]
pub struct RegistryState {
    pub(crate) connections: HashMap<String, ConnectionHandle>,
    pub(crate) locations: LocationSnapshot,
}

/// Shared registry of live connections and their last reported locations.
///
/// Constructed once by the server and handed to every connection task as an
/// `Arc<Registry>`.
#[derive(Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks both maps for the duration of the returned guard.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().await
    }

    /// Inserts `id → handle`, returning any handle it replaced.
    ///
    /// A replaced handle is orphaned: its session keeps running until its own
    /// read fails.
    pub async fn register(&self, id: &str, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let mut state = self.lock().await;
        let replaced = state.connections.insert(id.to_string(), handle);
        debug!("Registered {} ({} connected)", id, state.connections.len());
        replaced
    }

    /// Removes `id` from both maps. Removing an absent id is a no-op.
    pub async fn unregister(&self, id: &str) {
        let mut state = self.lock().await;
        state.connections.remove(id);
        state.locations.remove(id);
    }

    /// Lifecycle cleanup for one connection.
    ///
    /// Drops the `connections` entry only if it still holds `handle`; the
    /// location entry is always dropped. Returns whether the connection entry
    /// was removed.
    pub async fn release(&self, id: &str, handle: &ConnectionHandle) -> bool {
        let mut state = self.lock().await;
        let owned = state
            .connections
            .get(id)
            .is_some_and(|current| current.same_connection(handle));
        if owned {
            state.connections.remove(id);
        }
        state.locations.remove(id);
        owned
    }

    /// Inserts or overwrites the last reported location for `id`.
    pub async fn update_location(&self, id: &str, location: Location) {
        let mut state = self.lock().await;
        state.locations.insert(id.to_string(), location);
    }

    /// Returns an independent copy of the location map.
    pub async fn snapshot(&self) -> LocationSnapshot {
        self.lock().await.locations.clone()
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.lock().await.connections.len()
    }

    /// Returns whether `id` has a registered connection.
    pub async fn is_registered(&self, id: &str) -> bool {
        self.lock().await.connections.contains_key(id)
    }
}
