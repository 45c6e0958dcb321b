//! Bounded random-walk calibration drift

use std::collections::BTreeMap;

use rand::Rng;

use crate::profile::ResolvedSensor;

/// Drift never walks further than this from zero, in either direction.
const DRIFT_LIMIT: f64 = 0.5;

/// Per-sensor, per-axis drift state, confined to the simulation worker.
#[derive(Debug, Default)]
pub(crate) struct DriftTracker {
    values: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DriftTracker {
    /// Zero drift for every axis of every resolved sensor.
    pub(crate) fn new(sensors: &[ResolvedSensor]) -> Self {
        let mut values = BTreeMap::new();
        for sensor in sensors {
            let axes: BTreeMap<String, f64> = sensor
                .baseline
                .keys()
                .map(|axis| (axis.clone(), 0.0))
                .collect();
            values.insert(sensor.name.clone(), axes);
        }
        Self { values }
    }

    /// Advance one axis by a uniform step and clamp to the drift limit.
    pub(crate) fn step(
        &mut self,
        sensor: &str,
        axis: &str,
        drift_factor: f64,
        rng: &mut impl Rng,
    ) -> f64 {
        let entry = self
            .values
            .entry(sensor.to_string())
            .or_default()
            .entry(axis.to_string())
            .or_insert(0.0);
        if drift_factor > 0.0 {
            *entry += rng.gen_range(-drift_factor..drift_factor);
            *entry = entry.clamp(-DRIFT_LIMIT, DRIFT_LIMIT);
        }
        *entry
    }

    /// Current drift for one axis, zero when never stepped.
    pub(crate) fn value(&self, sensor: &str, axis: &str) -> f64 {
        self.values
            .get(sensor)
            .and_then(|axes| axes.get(axis))
            .copied()
            .unwrap_or(0.0)
    }
}
