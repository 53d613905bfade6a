// CPU percentage from two cumulative samples, memory limit normalization.

use crate::models::RawUsageSample;

/// CPU usage of one container between `previous` and `current`, as a share of
/// the whole host (100 = every core busy), clamped to 0..=100.
///
/// Returns 0 when there is no previous sample or when either delta is not positive.
pub fn estimate_cpu_percent(current: &RawUsageSample, previous: Option<&RawUsageSample>) -> f64 {
    let Some(previous) = previous else {
        return 0.0;
    };
    let cpu_delta = current.cpu_total as i128 - previous.cpu_total as i128;
    let system_delta = current.system_total as i128 - previous.system_total as i128;
    if cpu_delta <= 0 || system_delta <= 0 {
        return 0.0;
    }
    ((cpu_delta as f64 / system_delta as f64) * 100.0).clamp(0.0, 100.0)
}

/// Memory limit in bytes; the host's total memory stands in for "no limit".
pub fn effective_memory_limit(sample: &RawUsageSample, host_total_bytes: u64) -> u64 {
    match sample.memory_limit {
        Some(limit) if limit > 0 => limit,
        _ => host_total_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cpu_total: u64, system_total: u64) -> RawUsageSample {
        RawUsageSample {
            cpu_total,
            system_total,
            ..Default::default()
        }
    }

    #[test]
    fn no_previous_sample_is_zero() {
        assert_eq!(estimate_cpu_percent(&sample(1500, 15000), None), 0.0);
    }

    #[test]
    fn ten_percent_of_host() {
        let prev = sample(1000, 10000);
        let cur = sample(1500, 15000);
        assert!((estimate_cpu_percent(&cur, Some(&prev)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_deltas_are_zero() {
        let prev = sample(1000, 10000);
        assert_eq!(estimate_cpu_percent(&sample(1000, 15000), Some(&prev)), 0.0);
        assert_eq!(estimate_cpu_percent(&sample(900, 15000), Some(&prev)), 0.0);
        assert_eq!(estimate_cpu_percent(&sample(1500, 10000), Some(&prev)), 0.0);
        assert_eq!(estimate_cpu_percent(&sample(1500, 9000), Some(&prev)), 0.0);
    }

    #[test]
    fn clamps_above_full_host() {
        let prev = sample(0, 0);
        let cur = sample(8000, 1000);
        assert_eq!(estimate_cpu_percent(&cur, Some(&prev)), 100.0);
    }

    #[test]
    fn matches_ratio_over_a_grid() {
        for cpu_delta in [1u64, 7, 250, 999, 5000, 123_456] {
            for sys_delta in [1u64, 10, 1000, 77_777, 1_000_000] {
                let prev = sample(10, 20);
                let cur = sample(10 + cpu_delta, 20 + sys_delta);
                let expected = (cpu_delta as f64 / sys_delta as f64 * 100.0).clamp(0.0, 100.0);
                let got = estimate_cpu_percent(&cur, Some(&prev));
                assert!((0.0..=100.0).contains(&got));
                assert!((got - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn missing_limit_falls_back_to_host_total() {
        let mut s = sample(0, 0);
        assert_eq!(effective_memory_limit(&s, 4096), 4096);
        s.memory_limit = Some(0);
        assert_eq!(effective_memory_limit(&s, 4096), 4096);
        s.memory_limit = Some(1024);
        assert_eq!(effective_memory_limit(&s, 4096), 1024);
    }
}
