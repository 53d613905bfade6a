// Host-level models

use serde::{Deserialize, Serialize};

/// 1, 5 and 15 minute load averages; serializes as a 3-element array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage(pub f64, pub f64, pub f64);

/// Raw OS counters read from the host in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HostCounters {
    pub hostname: String,
    pub total_memory_bytes: u64,
    pub available_memory_bytes: u64,
    pub cpu_cores: u32,
    pub load_average: LoadAverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    pub hostname: String,
    /// Total physical memory, MiB.
    pub total_memory: u64,
    pub memory_usage_percent: f64,
    pub cpu_cores: u32,
    pub cpu_usage: f64,
    pub load_average: LoadAverage,
}
