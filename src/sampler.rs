// One sampling pass over the host and every container.
// Retains the last RawUsageSample per running container so the next pass can compute a CPU delta.

use crate::estimator::{effective_memory_limit, estimate_cpu_percent};
use crate::models::{
    ContainerListing, ContainerSnapshot, HostSnapshot, RawUsageSample, Snapshot, bytes_to_mib,
};
use crate::platform::{ContainerPlatform, HostPlatform};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{instrument, warn};

pub struct Sampler {
    host: Arc<dyn HostPlatform>,
    containers: Arc<dyn ContainerPlatform>,
    /// Previous sample per container id. Entries only exist for containers that were
    /// running and sampled successfully on their last poll.
    retained: Mutex<HashMap<String, RawUsageSample>>,
}

impl Sampler {
    pub fn new(host: Arc<dyn HostPlatform>, containers: Arc<dyn ContainerPlatform>) -> Self {
        Self {
            host,
            containers,
            retained: Mutex::new(HashMap::new()),
        }
    }

    /// Full reading: host plus all containers. Only a failure to read the host's
    /// own counters produces an error snapshot.
    #[instrument(skip(self), fields(operation = "sample"))]
    pub async fn sample(&self) -> Snapshot {
        let host = match self.sample_host().await {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, operation = "sample_host", "host sampling failed");
                return Snapshot::error(format!("host sampling failed: {}", e));
            }
        };
        let containers = self.sample_containers(host.total_memory).await;
        Snapshot::Metrics { containers, host }
    }

    pub async fn sample_host(&self) -> anyhow::Result<HostSnapshot> {
        let (counters, cpu) = tokio::join!(self.host.host_counters(), self.host.cpu_usage_percent());
        let counters = counters?;
        let cpu_usage = cpu.unwrap_or_else(|e| {
            warn!(error = %e, operation = "cpu_usage_percent", "host CPU usage unavailable");
            0.0
        });

        let total = counters.total_memory_bytes;
        let used = total.saturating_sub(counters.available_memory_bytes);
        let memory_usage_percent = if total > 0 {
            (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Ok(HostSnapshot {
            hostname: counters.hostname,
            total_memory: bytes_to_mib(total),
            memory_usage_percent,
            cpu_cores: counters.cpu_cores.max(1),
            cpu_usage: cpu_usage.clamp(0.0, 100.0),
            load_average: counters.load_average,
        })
    }

    /// Never fails: platform-wide errors yield an empty list, per-container
    /// errors yield a zeroed entry.
    pub async fn sample_containers(&self, host_total_memory_mib: u64) -> Vec<ContainerSnapshot> {
        let listing = match self.containers.list_containers().await {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, operation = "list_containers", "container listing failed");
                return Vec::new();
            }
        };

        self.forget_missing(&listing);

        let host_total_bytes = host_total_memory_mib * crate::models::BYTES_PER_MIB;
        join_all(
            listing
                .iter()
                .map(|c| self.sample_container(c, host_total_bytes)),
        )
        .await
    }

    async fn sample_container(
        &self,
        listing: &ContainerListing,
        host_total_bytes: u64,
    ) -> ContainerSnapshot {
        if !listing.state.is_running() {
            self.forget(&listing.id);
            return ContainerSnapshot::idle(listing);
        }

        let current = match self.containers.usage_sample(&listing.id).await {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    error = %e,
                    operation = "usage_sample",
                    container = %listing.name,
                    "container stats failed"
                );
                self.forget(&listing.id);
                return ContainerSnapshot::idle(listing);
            }
        };

        let previous = self
            .lock_retained()
            .insert(listing.id.clone(), current.clone())
            .filter(|p| current.same_run_as(p));

        ContainerSnapshot {
            id: listing.id.clone(),
            name: listing.name.clone(),
            image: listing.image.clone(),
            status: listing.status.clone(),
            cpu: estimate_cpu_percent(&current, previous.as_ref()),
            ram_usage: bytes_to_mib(current.memory_usage),
            ram_limit: bytes_to_mib(effective_memory_limit(&current, host_total_bytes)),
        }
    }

    /// Drop retained samples of containers that are gone from the platform.
    fn forget_missing(&self, listing: &[ContainerListing]) {
        let mut retained = self.lock_retained();
        retained.retain(|id, _| listing.iter().any(|c| &c.id == id));
    }

    fn forget(&self, id: &str) {
        self.lock_retained().remove(id);
    }

    /// Drop every retained sample; the next reading of each container will be 0% CPU.
    pub fn purge_all(&self) {
        let mut retained = self.lock_retained();
        if !retained.is_empty() {
            tracing::debug!(count = retained.len(), "purging retained usage samples");
        }
        retained.clear();
    }

    pub fn retained_count(&self) -> usize {
        self.lock_retained().len()
    }

    fn lock_retained(&self) -> MutexGuard<'_, HashMap<String, RawUsageSample>> {
        // The map holds plain data; a panic mid-update cannot leave it inconsistent.
        self.retained
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
