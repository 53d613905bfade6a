// Extract cumulative counters from a raw Docker stats API response.

use crate::models::RawUsageSample;
use bollard::models::ContainerStatsResponse;

/// `None` when the response lacks CPU counters (e.g. the container stopped mid-request).
pub(crate) fn usage_sample(
    s: &ContainerStatsResponse,
    started_at: Option<String>,
) -> Option<RawUsageSample> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let cpu_total = cpu_stats.cpu_usage.as_ref()?.total_usage?;
    let system_total = cpu_stats.system_cpu_usage.unwrap_or(0);

    let memory_usage = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let memory_limit = s
        .memory_stats
        .as_ref()
        .and_then(|m| m.limit)
        .filter(|l| *l > 0);

    Some(RawUsageSample {
        cpu_total,
        system_total,
        memory_usage,
        memory_limit,
        started_at,
    })
}
