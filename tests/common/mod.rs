// Shared test helpers: in-process fakes for the platform traits.
#![allow(dead_code)]

use container_pulse::models::*;
use container_pulse::platform::{ContainerPlatform, HostPlatform};
use container_pulse::sampler::Sampler;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;

pub const GIB: u64 = 1024 * 1024 * 1024;

pub struct FakeHost {
    pub counters_fail: AtomicBool,
    pub cpu_fail: AtomicBool,
    pub cpu_usage: Mutex<f64>,
    pub total_memory_bytes: u64,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            counters_fail: AtomicBool::new(false),
            cpu_fail: AtomicBool::new(false),
            cpu_usage: Mutex::new(25.0),
            total_memory_bytes: 8 * GIB,
        }
    }
}

#[async_trait::async_trait]
impl HostPlatform for FakeHost {
    async fn host_counters(&self) -> anyhow::Result<HostCounters> {
        anyhow::ensure!(!self.counters_fail.load(Ordering::SeqCst), "host counters unavailable");
        Ok(HostCounters {
            hostname: "test-host".into(),
            total_memory_bytes: self.total_memory_bytes,
            available_memory_bytes: self.total_memory_bytes / 4,
            cpu_cores: 4,
            load_average: LoadAverage(0.5, 0.25, 0.1),
        })
    }

    async fn cpu_usage_percent(&self) -> anyhow::Result<f64> {
        anyhow::ensure!(!self.cpu_fail.load(Ordering::SeqCst), "cpu load unavailable");
        Ok(*self.cpu_usage.lock().unwrap())
    }
}

#[derive(Default)]
pub struct FakeContainers {
    /// `None` = platform unreachable.
    pub listing: Mutex<Option<Vec<ContainerListing>>>,
    pub samples: Mutex<HashMap<String, RawUsageSample>>,
    pub failing: Mutex<HashSet<String>>,
    pub list_calls: AtomicUsize,
    pub sample_calls: AtomicUsize,
    /// Simulated latency of the listing call.
    pub list_delay: Mutex<Option<Duration>>,
}

impl FakeContainers {
    pub fn with(listing: Vec<ContainerListing>) -> Self {
        let fake = Self::default();
        *fake.listing.lock().unwrap() = Some(listing);
        fake
    }

    pub fn set_listing(&self, listing: Option<Vec<ContainerListing>>) {
        *self.listing.lock().unwrap() = listing;
    }

    pub fn set_sample(&self, id: &str, sample: RawUsageSample) {
        self.samples.lock().unwrap().insert(id.to_string(), sample);
    }

    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn recover(&self, id: &str) {
        self.failing.lock().unwrap().remove(id);
    }
}

#[async_trait::async_trait]
impl ContainerPlatform for FakeContainers {
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerListing>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        self.listing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("docker daemon unreachable"))
    }

    async fn usage_sample(&self, id: &str) -> anyhow::Result<RawUsageSample> {
        self.sample_calls.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.failing.lock().unwrap().contains(id), "stats failed for {}", id);
        self.samples
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such container {}", id))
    }
}

pub fn listing(id: &str, state: ContainerState) -> ContainerListing {
    ContainerListing {
        id: id.to_string(),
        name: format!("{}-name", id),
        image: "nginx:latest".into(),
        state,
        status: match state {
            ContainerState::Running => "Up 5 minutes".into(),
            _ => "Exited (0) 1 minute ago".into(),
        },
    }
}

pub fn running(id: &str) -> ContainerListing {
    listing(id, ContainerState::Running)
}

pub fn sample(cpu_total: u64, system_total: u64) -> RawUsageSample {
    RawUsageSample {
        cpu_total,
        system_total,
        memory_usage: 256 * 1024 * 1024,
        memory_limit: Some(GIB),
        started_at: Some("2026-10-16T08:00:00Z".into()),
    }
}

pub fn sampler(host: Arc<FakeHost>, containers: Arc<FakeContainers>) -> Arc<Sampler> {
    Arc::new(Sampler::new(host, containers))
}

pub fn metrics(snapshot: &Snapshot) -> (&[ContainerSnapshot], &HostSnapshot) {
    match snapshot {
        Snapshot::Metrics { containers, host } => (containers, host),
        Snapshot::Error { error } => panic!("expected metrics, got error: {}", error),
    }
}
