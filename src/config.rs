use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    /// Max age of the cached snapshot before the next reader triggers a new pass.
    #[serde(default = "default_snapshot_ttl_ms")]
    pub snapshot_ttl_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            snapshot_ttl_ms: default_snapshot_ttl_ms(),
        }
    }
}

fn default_snapshot_ttl_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamingConfig {
    /// Per-connection push cadence.
    #[serde(default = "default_push_interval_ms")]
    pub push_interval_ms: u64,
    /// Reconnect delay advertised to SSE clients via `retry:`.
    #[serde(default = "default_retry_hint_ms")]
    pub retry_hint_ms: u64,
    /// Drop every retained usage sample when any stream client disconnects.
    #[serde(default = "default_purge_samples_on_disconnect")]
    pub purge_samples_on_disconnect: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            push_interval_ms: default_push_interval_ms(),
            retry_hint_ms: default_retry_hint_ms(),
            purge_samples_on_disconnect: default_purge_samples_on_disconnect(),
        }
    }
}

fn default_push_interval_ms() -> u64 {
    2000
}

fn default_retry_hint_ms() -> u64 {
    10_000
}

fn default_purge_samples_on_disconnect() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (stream clients, fetches, retained samples) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.sampling.snapshot_ttl_ms > 0,
            "sampling.snapshot_ttl_ms must be > 0, got {}",
            self.sampling.snapshot_ttl_ms
        );
        anyhow::ensure!(
            self.streaming.push_interval_ms > 0,
            "streaming.push_interval_ms must be > 0, got {}",
            self.streaming.push_interval_ms
        );
        anyhow::ensure!(
            self.streaming.retry_hint_ms > 0,
            "streaming.retry_hint_ms must be > 0, got {}",
            self.streaming.retry_hint_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
