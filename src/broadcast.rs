// Per-client push streams fed from the shared snapshot cache.
// Each subscription owns its own timer; all of them read through one SnapshotCache,
// so the number of clients never changes the sampling rate.

use crate::models::Snapshot;
use crate::snapshot_cache::SnapshotCache;
use futures_util::Stream;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{Duration, MissedTickBehavior, interval};

pub struct StreamHub {
    cache: Arc<SnapshotCache>,
    connections: Arc<AtomicUsize>,
    push_interval: Duration,
    purge_samples_on_disconnect: bool,
}

impl StreamHub {
    pub fn new(
        cache: Arc<SnapshotCache>,
        push_interval: Duration,
        purge_samples_on_disconnect: bool,
    ) -> Self {
        Self {
            cache,
            connections: Arc::new(AtomicUsize::new(0)),
            push_interval,
            purge_samples_on_disconnect,
        }
    }

    /// Open one client stream. The first payload is produced immediately, then one per
    /// push interval. Dropping the stream is the disconnect.
    pub fn subscribe(
        &self,
        transport: &'static str,
    ) -> impl Stream<Item = String> + Send + use<> {
        let guard = ConnectionGuard::open(self, transport);
        let cache = self.cache.clone();
        let mut tick = interval(self.push_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        futures_util::stream::unfold((tick, guard), move |(mut tick, guard)| {
            let cache = cache.clone();
            async move {
                tick.tick().await;
                let snapshot = cache.get_snapshot().await;
                Some((snapshot_payload(&snapshot), (tick, guard)))
            }
        })
    }

    /// Currently connected stream clients.
    pub fn client_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }
}

/// JSON text of one push. Falls back to an `{error}` payload if serialization fails.
pub fn snapshot_payload(snapshot: &Snapshot) -> String {
    serde_json::to_string(snapshot).unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation = "serialize_snapshot", "snapshot serialization failed");
        serde_json::json!({ "error": format!("serialization failed: {}", e) }).to_string()
    })
}

/// Counts a stream client while alive (connect = +1, drop = -1). On drop it also
/// applies the disconnect purge policy.
struct ConnectionGuard {
    connections: Arc<AtomicUsize>,
    purge_on_drop: Option<Arc<SnapshotCache>>,
    transport: &'static str,
}

impl ConnectionGuard {
    fn open(hub: &StreamHub, transport: &'static str) -> Self {
        let open = hub.connections.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(transport, stream_clients = open, "Client connected to stats stream");
        Self {
            connections: hub.connections.clone(),
            purge_on_drop: hub
                .purge_samples_on_disconnect
                .then(|| hub.cache.clone()),
            transport,
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let open = self
            .connections
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1);
        // Process-wide: every container's next CPU reading will be 0%.
        if let Some(cache) = &self.purge_on_drop {
            cache.sampler().purge_all();
        }
        tracing::info!(
            transport = self.transport,
            stream_clients = open,
            "Client disconnected from stats stream"
        );
    }
}
