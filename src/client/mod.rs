// Browser-side pipeline, expressed without I/O: the embedding page feeds events
// (messages, errors, visibility changes, timers) and executes the returned effects.

mod backoff;
mod history;
mod resilience;
mod store;

pub use backoff::Backoff;
pub use history::{EntityKey, HISTORY_CAPACITY, HistoryBuffer, MetricKind};
pub use resilience::{ConnectionState, Effect, StatusHint, StreamClient, decode_snapshot};
pub use store::{MemoryStore, SnapshotStore, StoreError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed snapshot message: {0}")]
    Malformed(#[from] serde_json::Error),
}
