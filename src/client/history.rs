// Bounded rolling series per (entity, metric) for charting.

use std::collections::{HashMap, HashSet, VecDeque};

pub const HISTORY_CAPACITY: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    /// Host series are never cleaned up.
    Host,
    Container(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    Cpu,
    Ram,
}

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    series: HashMap<(EntityKey, MetricKind), VecDeque<f64>>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: HashMap::new(),
        }
    }

    /// Append a percentage, clamped to 0..=100. A series seen for the first time is
    /// filled to capacity with this value so its chart starts as a flat line.
    pub fn observe(&mut self, key: EntityKey, kind: MetricKind, value: f64) {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 100.0)
        };
        let capacity = self.capacity;
        let series = self
            .series
            .entry((key, kind))
            .or_insert_with(|| std::iter::repeat_n(value, capacity - 1).collect());
        series.push_back(value);
        while series.len() > capacity {
            series.pop_front();
        }
    }

    pub fn series(&self, key: &EntityKey, kind: MetricKind) -> Option<&VecDeque<f64>> {
        self.series.get(&(key.clone(), kind))
    }

    /// Drop every container series whose id is not in `active`. Returns the removed
    /// container ids, sorted, so their charts can be torn down.
    pub fn cleanup(&mut self, active: &HashSet<String>) -> Vec<String> {
        let mut removed: Vec<String> = Vec::new();
        self.series.retain(|(key, _), _| match key {
            EntityKey::Host => true,
            EntityKey::Container(id) if active.contains(id) => true,
            EntityKey::Container(id) => {
                removed.push(id.clone());
                false
            }
        });
        removed.sort();
        removed.dedup();
        removed
    }

    /// Number of tracked series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str) -> EntityKey {
        EntityKey::Container(id.to_string())
    }

    #[test]
    fn new_series_is_seeded_to_capacity() {
        let mut h = HistoryBuffer::default();
        h.observe(EntityKey::Host, MetricKind::Cpu, 12.5);
        let s = h.series(&EntityKey::Host, MetricKind::Cpu).unwrap();
        assert_eq!(s.len(), HISTORY_CAPACITY);
        assert!(s.iter().all(|v| *v == 12.5));
    }

    #[test]
    fn keeps_last_sixty_in_order() {
        let mut h = HistoryBuffer::default();
        for i in 0..61 {
            h.observe(container("a"), MetricKind::Ram, i as f64);
        }
        let s: Vec<f64> = h
            .series(&container("a"), MetricKind::Ram)
            .unwrap()
            .iter()
            .copied()
            .collect();
        let expected: Vec<f64> = (1..61).map(|i| i as f64).collect();
        assert_eq!(s, expected);
    }

    #[test]
    fn values_are_clamped() {
        let mut h = HistoryBuffer::new(3);
        h.observe(EntityKey::Host, MetricKind::Cpu, 50.0);
        h.observe(EntityKey::Host, MetricKind::Cpu, 140.0);
        h.observe(EntityKey::Host, MetricKind::Cpu, -3.0);
        h.observe(EntityKey::Host, MetricKind::Cpu, f64::NAN);
        let s: Vec<f64> = h
            .series(&EntityKey::Host, MetricKind::Cpu)
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(s, vec![100.0, 0.0, 0.0]);
    }

    #[test]
    fn cleanup_with_empty_set_keeps_only_host() {
        let mut h = HistoryBuffer::default();
        h.observe(EntityKey::Host, MetricKind::Cpu, 1.0);
        h.observe(EntityKey::Host, MetricKind::Ram, 1.0);
        h.observe(container("a"), MetricKind::Cpu, 1.0);
        h.observe(container("a"), MetricKind::Ram, 1.0);
        h.observe(container("b"), MetricKind::Cpu, 1.0);

        let removed = h.cleanup(&HashSet::new());
        assert_eq!(removed, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(h.len(), 2);
        assert!(h.series(&EntityKey::Host, MetricKind::Ram).is_some());
    }

    #[test]
    fn cleanup_keeps_active_containers() {
        let mut h = HistoryBuffer::default();
        h.observe(container("a"), MetricKind::Cpu, 1.0);
        h.observe(container("b"), MetricKind::Cpu, 1.0);
        let active: HashSet<String> = ["b".to_string()].into_iter().collect();
        assert_eq!(h.cleanup(&active), vec!["a".to_string()]);
        assert!(h.series(&container("b"), MetricKind::Cpu).is_some());
        assert!(h.cleanup(&active).is_empty());
    }
}
