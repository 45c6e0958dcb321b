// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! The externally observable surface of the simulation
//!
//! The simulation worker commits one sensor at a time; readers polling from
//! other threads always see the most recently committed values. Commits are
//! atomic per sensor, so a reader sampling mid-tick may observe some sensors
//! from the current tick and others from the previous one. Swapping a whole
//! tick at once would remove that tearing and is a valid strengthening, but
//! per-sensor commits are the documented contract.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

type SensorValues = BTreeMap<String, f64>;

/// Cloneable handle to the latest committed sensor values.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<BTreeMap<String, SensorValues>>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one sensor's values. Called from the simulation worker only.
    pub(crate) fn commit(&self, sensor: &str, values: SensorValues) {
        self.inner.write().insert(sensor.to_string(), values);
    }

    /// All current values, cloned out of the lock.
    pub fn current_values(&self) -> BTreeMap<String, SensorValues> {
        self.inner.read().clone()
    }

    /// Current values for a single sensor, if it has ever been committed.
    pub fn get(&self, sensor: &str) -> Option<SensorValues> {
        self.inner.read().get(sensor).cloned()
    }

    /// True when nothing has been committed since creation or [`clear`].
    ///
    /// [`clear`]: SnapshotStore::clear
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop all committed values.
    pub(crate) fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_then_read() {
        let store = SnapshotStore::new();
        assert!(store.is_empty());

        let mut values = BTreeMap::new();
        values.insert("lux".to_string(), 480.5);
        store.commit("light", values);

        let current = store.current_values();
        assert_eq!(current.get("light").and_then(|v| v.get("lux")), Some(&480.5));
        assert!(store.get("proximity").is_none());
    }

    #[test]
    fn commit_replaces_previous_values() {
        let store = SnapshotStore::new();
        let mut first = BTreeMap::new();
        first.insert("hPa".to_string(), 1010.0);
        store.commit("pressure", first);

        let mut second = BTreeMap::new();
        second.insert("hPa".to_string(), 1021.3);
        store.commit("pressure", second);

        assert_eq!(
            store.get("pressure").unwrap().get("hPa"),
            Some(&1021.3)
        );
    }

    #[test]
    fn clear_empties_the_store() {
        let store = SnapshotStore::new();
        let mut values = BTreeMap::new();
        values.insert("celsius".to_string(), 21.7);
        store.commit("temperature", values);
        store.clear();
        assert!(store.is_empty());
    }
}
