// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! Static fallback baselines and variances, keyed by sensor name
//!
//! Profiles may legally omit `baseline`/`variance` for any sensor. Resolution
//! through this table is mandatory and infallible: a sparse profile must
//! never fail a tick.

use std::collections::BTreeMap;

use tracing::info;

use super::SensorSpec;

/// Convenience constructor for a three-axis map.
pub(crate) fn axes3(x: f64, y: f64, z: f64) -> BTreeMap<String, f64> {
    let mut map = BTreeMap::new();
    map.insert("x".to_string(), x);
    map.insert("y".to_string(), y);
    map.insert("z".to_string(), z);
    map
}

/// Convenience constructor for a single named axis.
pub(crate) fn axis(name: &str, value: f64) -> BTreeMap<String, f64> {
    let mut map = BTreeMap::new();
    map.insert(name.to_string(), value);
    map
}

/// Nominal steady-state baseline for a sensor with no explicit configuration.
pub fn default_baseline(sensor: &str) -> BTreeMap<String, f64> {
    match sensor {
        "accelerometer" => axes3(0.0, 0.0, 9.81),
        "gyroscope" => axes3(0.0, 0.0, 0.0),
        "magnetometer" => axes3(25.0, 10.0, 40.0),
        "proximity" => axis("distance", 100.0),
        "light" => axis("lux", 500.0),
        "pressure" => axis("hPa", 1013.25),
        "temperature" => axis("celsius", 22.0),
        "humidity" => axis("percent", 50.0),
        _ => axis("value", 0.0),
    }
}

/// Noise variance paired with [`default_baseline`].
pub fn default_variance(sensor: &str) -> BTreeMap<String, f64> {
    match sensor {
        "accelerometer" => axes3(0.1, 0.1, 0.1),
        "gyroscope" => axes3(0.02, 0.02, 0.02),
        "magnetometer" => axes3(2.0, 2.0, 2.0),
        "proximity" => axis("distance", 0.0),
        "light" => axis("lux", 50.0),
        "pressure" => axis("hPa", 0.5),
        "temperature" => axis("celsius", 0.5),
        "humidity" => axis("percent", 1.0),
        _ => axis("value", 0.1),
    }
}

/// A sensor with its baseline and variance fully resolved.
///
/// Resolution happens once at simulation start so the tick loop never has to
/// ask whether a key is present.
#[derive(Debug, Clone)]
pub struct ResolvedSensor {
    /// Sensor name as it appears in the profile and the snapshot.
    pub name: String,
    /// Baseline value per axis.
    pub baseline: BTreeMap<String, f64>,
    /// Noise variance per axis, guaranteed to cover every baseline axis.
    pub variance: BTreeMap<String, f64>,
}

/// Resolve a profile entry against the default table.
pub fn resolve(name: &str, spec: &SensorSpec) -> ResolvedSensor {
    let baseline = match &spec.baseline {
        Some(map) if !map.is_empty() => map.clone(),
        _ => {
            info!("sensor {} has no baseline configured, using defaults", name);
            default_baseline(name)
        }
    };

    let mut variance = match &spec.variance {
        Some(map) if !map.is_empty() => map.clone(),
        _ => {
            info!("sensor {} has no variance configured, using defaults", name);
            default_variance(name)
        }
    };

    // Every baseline axis needs a variance entry; fill gaps from the table.
    let table = default_variance(name);
    for axis in baseline.keys() {
        if !variance.contains_key(axis) {
            variance.insert(
                axis.clone(),
                table.get(axis).copied().unwrap_or(0.0),
            );
        }
    }

    ResolvedSensor {
        name: name.to_string(),
        baseline,
        variance,
    }
}
