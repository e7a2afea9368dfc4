use std::collections::BTreeMap;

use crate::domain::calendar::QuarterKey;

/// Weekly hours available per quarter, keyed by `"{year}-Q{n}"`.
///
/// Values are stored signed so a negative entry can reach the allocation
/// engine, which clamps it to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityTable {
    entries: BTreeMap<String, i64>,
}

impl CapacityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, weekly_hours: i64) {
        self.entries.insert(key.to_string(), weekly_hours);
    }

    pub fn with(mut self, key: &str, weekly_hours: i64) -> Self {
        self.insert(key, weekly_hours);
        self
    }

    pub fn get(&self, key: &QuarterKey) -> Option<i64> {
        self.entries.get(key.as_str()).copied()
    }

    /// Weekly hours for `key`, `default` when absent, never below zero.
    pub fn resolve(&self, key: &QuarterKey, default: u32) -> f64 {
        match self.get(key) {
            Some(value) => value.max(0) as f64,
            None => f64::from(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_default_for_missing_quarter() {
        let table = CapacityTable::new().with("2025-Q1", 300);
        assert_eq!(table.resolve(&QuarterKey::new(2025, 1), 500), 300.0);
        assert_eq!(table.resolve(&QuarterKey::new(2025, 2), 500), 500.0);
    }

    #[test]
    fn resolve_clamps_negative_capacity_to_zero() {
        let table = CapacityTable::new().with("2025-Q1", -20);
        assert_eq!(table.resolve(&QuarterKey::new(2025, 1), 500), 0.0);
    }
}
