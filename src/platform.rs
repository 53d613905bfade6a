// Read-only platform operations the sampler depends on.
// Production: SysinfoRepo (host) and DockerRepo (containers). Tests plug in fakes.

use crate::models::{ContainerListing, HostCounters, RawUsageSample};

/// Host OS counters.
#[async_trait::async_trait]
pub trait HostPlatform: Send + Sync {
    /// Memory, core count, load averages and hostname.
    async fn host_counters(&self) -> anyhow::Result<HostCounters>;

    /// Instantaneous whole-host CPU load, 0..=100.
    async fn cpu_usage_percent(&self) -> anyhow::Result<f64>;
}

/// Container runtime.
#[async_trait::async_trait]
pub trait ContainerPlatform: Send + Sync {
    /// Every container known to the runtime, running or not, in listing order.
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerListing>>;

    /// One point-in-time reading of a container's cumulative counters.
    async fn usage_sample(&self, id: &str) -> anyhow::Result<RawUsageSample>;
}
