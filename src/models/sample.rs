// Cumulative usage counters for one container at one instant

/// Raw counters as reported by the platform; never sent to clients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawUsageSample {
    /// Cumulative CPU time consumed by the container (ns).
    pub cpu_total: u64,
    /// Cumulative CPU time of the whole host (ns).
    pub system_total: u64,
    pub memory_usage: u64,
    /// `None` when the platform reports no limit.
    pub memory_limit: Option<u64>,
    /// Start time of the current container run; changes on restart.
    pub started_at: Option<String>,
}

impl RawUsageSample {
    /// Whether `previous` was taken during the same run of the container, so the
    /// cumulative counters are comparable.
    pub fn same_run_as(&self, previous: &RawUsageSample) -> bool {
        let same_start = match (&self.started_at, &previous.started_at) {
            (Some(now), Some(then)) => now == then,
            _ => true,
        };
        same_start && self.cpu_total >= previous.cpu_total
    }
}
