// TTL cache in front of the sampler; many concurrent readers, one upstream pass per window.

use crate::models::Snapshot;
use crate::sampler::Sampler;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

struct Cached {
    snapshot: Arc<Snapshot>,
    taken_at: Instant,
}

pub struct SnapshotCache {
    sampler: Arc<Sampler>,
    ttl: Duration,
    /// Held across the refresh: callers arriving mid-refresh queue here and then
    /// find the fresh entry instead of starting their own pass.
    last: Mutex<Option<Cached>>,
    fetches: AtomicU64,
}

impl SnapshotCache {
    pub fn new(sampler: Arc<Sampler>, ttl: Duration) -> Self {
        Self {
            sampler,
            ttl,
            last: Mutex::new(None),
            fetches: AtomicU64::new(0),
        }
    }

    /// Latest snapshot, refreshed at most once per TTL window.
    pub async fn get_snapshot(&self) -> Arc<Snapshot> {
        let mut last = self.last.lock().await;
        if let Some(cached) = last.as_ref()
            && cached.taken_at.elapsed() < self.ttl
        {
            tracing::trace!("snapshot cache hit");
            return cached.snapshot.clone();
        }

        // The window starts when the pass starts, so sampling latency does not stretch it.
        let started = Instant::now();
        let snapshot = Arc::new(self.sampler.sample().await);
        self.fetches.fetch_add(1, Ordering::Relaxed);
        *last = Some(Cached {
            snapshot: snapshot.clone(),
            taken_at: started,
        });
        snapshot
    }

    /// Number of upstream sampling passes so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn sampler(&self) -> &Arc<Sampler> {
        &self.sampler
    }
}
