// Background app-stats logger. Sampling itself is driven by the stream clients
// through the snapshot cache; this task only reports on it.

use crate::broadcast::StreamHub;
use std::sync::Arc;
use tokio::time::{Duration, MissedTickBehavior, interval};

pub struct StatsLoggerConfig {
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn_stats_logger(
    hub: Arc<StreamHub>,
    config: StatsLoggerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(config.stats_log_interval_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the immediate first tick; nothing has happened yet.
        tick.reset();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    tracing::info!(
                        stream_clients = hub.client_count(),
                        snapshot_fetches_total = hub.cache().fetch_count(),
                        retained_samples = hub.cache().sampler().retained_count(),
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Stats logger shutting down");
                    break;
                }
            }
        }
    })
}
