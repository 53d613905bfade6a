// Snapshot: the unit pushed to every client

use serde::{Deserialize, Serialize};

use super::{ContainerSnapshot, HostSnapshot};

/// Either a full reading or the reason one could not be produced.
///
/// Untagged on the wire: `{"containers": [...], "host": {...}}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Metrics {
        containers: Vec<ContainerSnapshot>,
        host: HostSnapshot,
    },
    Error {
        error: String,
    },
}

impl Snapshot {
    pub fn error(message: impl Into<String>) -> Self {
        Snapshot::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Snapshot::Error { .. })
    }

    /// Ids of the containers in this snapshot; empty for an error snapshot.
    pub fn container_ids(&self) -> impl Iterator<Item = &str> {
        let containers: &[ContainerSnapshot] = match self {
            Snapshot::Metrics { containers, .. } => containers,
            Snapshot::Error { .. } => &[],
        };
        containers.iter().map(|c| c.id.as_str())
    }
}
