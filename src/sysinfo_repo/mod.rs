// Host counters via sysinfo

use crate::models::{HostCounters, LoadAverage};
use crate::platform::HostPlatform;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::System;
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    last_cpu_refresh: Arc<std::sync::Mutex<Option<(Instant, f64)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            last_cpu_refresh: Arc::new(std::sync::Mutex::new(None)),
        }
    }
}

#[async_trait::async_trait]
impl HostPlatform for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "host_counters"))]
    async fn host_counters(&self) -> anyhow::Result<HostCounters> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let load = System::load_average();
            Ok(HostCounters {
                hostname: System::host_name().unwrap_or_else(|| "unknown".into()),
                total_memory_bytes: sys.total_memory(),
                available_memory_bytes: sys.available_memory(),
                cpu_cores: (sys.cpus().len() as u32).max(1),
                load_average: LoadAverage(
                    load.one.max(0.0),
                    load.five.max(0.0),
                    load.fifteen.max(0.0),
                ),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_usage_percent"))]
    async fn cpu_usage_percent(&self) -> anyhow::Result<f64> {
        let sys = self.sys.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            let mut guard = last_cpu_refresh
                .lock()
                .map_err(|e| anyhow::anyhow!("cpu refresh lock poisoned: {}", e))?;

            let now = Instant::now();
            let usage = match *guard {
                // sysinfo needs two refreshes at least MINIMUM_CPU_UPDATE_INTERVAL apart;
                // in between, reuse the last reading instead of blocking.
                Some((prev_ts, prev_usage))
                    if now.duration_since(prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL =>
                {
                    prev_usage
                }
                Some(_) => {
                    sys.refresh_cpu_all();
                    let usage = sys.global_cpu_usage() as f64;
                    *guard = Some((now, usage));
                    usage
                }
                None => {
                    // First call establishes the baseline.
                    sys.refresh_cpu_all();
                    *guard = Some((now, 0.0));
                    0.0
                }
            };
            Ok(usage.clamp(0.0, 100.0))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}
