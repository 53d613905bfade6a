// Docker container models

use serde::{Deserialize, Serialize};

/// Docker container lifecycle state; serializes to lowercase JSON (e.g. "running").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    #[serde(other)]
    Unknown,
}

impl ContainerState {
    /// Parse from Docker API state string (e.g. "running", "exited").
    pub fn from_docker(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            _ => ContainerState::Unknown,
        }
    }

    pub fn is_running(self) -> bool {
        self == ContainerState::Running
    }
}

/// One entry of the platform's container listing (all containers, running or not).
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerListing {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    /// Human status text, e.g. "Up 3 hours" or "Exited (0) 2 days ago".
    pub status: String,
}

/// Per-container metrics as pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    /// CPU usage as a share of total host capacity, 0..=100.
    pub cpu: f64,
    /// Memory in use, MiB.
    pub ram_usage: u64,
    /// Memory limit, MiB. Host total memory when the container is unlimited.
    pub ram_limit: u64,
}

impl ContainerSnapshot {
    /// Snapshot with zeroed metrics, used for stopped containers and failed stats fetches.
    pub fn idle(listing: &ContainerListing) -> Self {
        Self {
            id: listing.id.clone(),
            name: listing.name.clone(),
            image: listing.image.clone(),
            status: listing.status.clone(),
            cpu: 0.0,
            ram_usage: 0,
            ram_limit: 0,
        }
    }
}
