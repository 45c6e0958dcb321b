// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! Sensor profiles - the declarative description of a simulated device
//!
//! A [`SensorProfile`] names the sensors a device exposes, their baselines
//! and noise variances, and the simulation parameters (tick rate, noise
//! scaling, drift, activity patterns). Profiles are plain serde documents;
//! any field a document omits is resolved through the default table in
//! [`defaults`] rather than rejected.

mod defaults;
mod store;

pub use defaults::{default_baseline, default_variance, resolve, ResolvedSensor};
pub use store::{ProfileDocument, ProfileStore};

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub(crate) use defaults::{axes3, axis};

/// Device classes with distinct sensor availability and noise magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Smartphone,
    Tablet,
    Smartwatch,
}

/// Activity being performed by the simulated device's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Stationary,
    Walking,
    Running,
    Driving,
}

/// Physical orientation of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePosition {
    Flat,
    Tilted,
    Vertical,
    UpsideDown,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceType::Smartphone => "smartphone",
            DeviceType::Tablet => "tablet",
            DeviceType::Smartwatch => "smartwatch",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityType::Stationary => "stationary",
            ActivityType::Walking => "walking",
            ActivityType::Running => "running",
            ActivityType::Driving => "driving",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for DevicePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DevicePosition::Flat => "flat",
            DevicePosition::Tilted => "tilted",
            DevicePosition::Vertical => "vertical",
            DevicePosition::UpsideDown => "upside_down",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smartphone" => Ok(DeviceType::Smartphone),
            "tablet" => Ok(DeviceType::Tablet),
            "smartwatch" => Ok(DeviceType::Smartwatch),
            other => Err(format!("unknown device type: {}", other)),
        }
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stationary" => Ok(ActivityType::Stationary),
            "walking" => Ok(ActivityType::Walking),
            "running" => Ok(ActivityType::Running),
            "driving" => Ok(ActivityType::Driving),
            other => Err(format!("unknown activity type: {}", other)),
        }
    }
}

impl FromStr for DevicePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(DevicePosition::Flat),
            "tilted" => Ok(DevicePosition::Tilted),
            "vertical" => Ok(DevicePosition::Vertical),
            "upside_down" => Ok(DevicePosition::UpsideDown),
            other => Err(format!("unknown device position: {}", other)),
        }
    }
}

/// Per-sensor configuration inside a profile.
///
/// `baseline` and `variance` are optional on purpose: sparse documents are
/// resolved through [`defaults::resolve`] at simulation start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Whether the sensor produces values at all.
    #[serde(default)]
    pub enabled: bool,
    /// Baseline value per axis; `None` falls back to the default table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BTreeMap<String, f64>>,
    /// Gaussian noise variance per axis; `None` falls back to the default table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<BTreeMap<String, f64>>,
}

impl SensorSpec {
    fn new(enabled: bool, baseline: BTreeMap<String, f64>, variance: BTreeMap<String, f64>) -> Self {
        Self {
            enabled,
            baseline: Some(baseline),
            variance: Some(variance),
        }
    }
}

fn default_noise_factor() -> f64 {
    0.05
}

fn default_update_frequency() -> f64 {
    50.0
}

fn default_drift_factor() -> f64 {
    0.001
}

/// Global knobs for the simulation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Scales every sensor's per-axis variance before noise sampling.
    #[serde(default = "default_noise_factor")]
    pub noise_factor: f64,
    /// Tick rate of the simulation loop, in Hz.
    #[serde(default = "default_update_frequency")]
    pub update_frequency: f64,
    /// Whether the bounded random-walk calibration drift runs.
    #[serde(default)]
    pub drift_enabled: bool,
    /// Per-tick uniform half-width of the drift walk.
    #[serde(default = "default_drift_factor")]
    pub drift_factor: f64,
    /// Activity waveform overlays, keyed by sensor name.
    #[serde(default)]
    pub patterns: BTreeMap<String, PatternSpec>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            noise_factor: default_noise_factor(),
            update_frequency: default_update_frequency(),
            drift_enabled: true,
            drift_factor: default_drift_factor(),
            patterns: BTreeMap::new(),
        }
    }
}

fn default_step_frequency() -> f64 {
    1.8
}

fn default_step_intensity() -> f64 {
    1.0
}

/// Deterministic activity waveform attached to a sensor.
///
/// Evaluation is a function of accumulated pattern time, never of wall-clock
/// time, so a stream can be replayed exactly from the same time values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternSpec {
    /// Plain sinusoid per axis.
    Sine {
        /// Peak offset per axis.
        amplitude: BTreeMap<String, f64>,
        /// Cycles per second per axis.
        frequency: BTreeMap<String, f64>,
        /// Phase offset in radians per axis, defaulting to zero.
        #[serde(default)]
        phase: BTreeMap<String, f64>,
    },
    /// Smooth sum-of-sines with occasional random jolts (vehicle motion).
    Mixed {
        /// The smooth low-frequency component.
        smooth: SmoothSpec,
        /// Per-tick probability of a jolt event.
        jolt_probability: f64,
        /// Uniform half-width of a jolt per axis.
        jolt_magnitude: BTreeMap<String, f64>,
    },
    /// Gait model with distinct impact and recovery phases per step.
    Realistic {
        /// Steps per second.
        #[serde(default = "default_step_frequency")]
        step_frequency: f64,
        /// Scales the impact and recovery envelopes.
        #[serde(default = "default_step_intensity")]
        step_intensity: f64,
    },
    /// Delegates to the injected learned-pattern provider.
    ///
    /// Accepts the legacy `ml_generated` tag found in older profile
    /// documents.
    #[serde(alias = "ml_generated")]
    External {
        /// Activity the provider should reproduce.
        activity: ActivityType,
        /// Device position the provider should reproduce.
        position: DevicePosition,
    },
}

/// Smooth component of a [`PatternSpec::Mixed`] waveform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothSpec {
    /// Peak offset per axis.
    pub amplitude: BTreeMap<String, f64>,
    /// Cycles per second per axis.
    pub frequency: BTreeMap<String, f64>,
}

impl PatternSpec {
    /// The built-in waveform for an activity/position pair.
    ///
    /// This single table serves both the profile builder and the degraded
    /// path taken when an external provider fails, so the two always agree.
    pub fn rule_based(activity: ActivityType, position: DevicePosition) -> Option<PatternSpec> {
        let mut spec = match activity {
            ActivityType::Stationary => return None,
            ActivityType::Walking => PatternSpec::Sine {
                amplitude: axes3(0.8, 1.2, 1.5),
                frequency: axes3(1.8, 1.8, 1.8),
                phase: axes3(0.0, FRAC_PI_2, FRAC_PI_4),
            },
            ActivityType::Running => PatternSpec::Sine {
                amplitude: axes3(1.5, 2.5, 3.0),
                frequency: axes3(3.0, 3.0, 3.0),
                phase: axes3(0.0, FRAC_PI_2, FRAC_PI_4),
            },
            ActivityType::Driving => PatternSpec::Mixed {
                smooth: SmoothSpec {
                    amplitude: axes3(0.3, 0.3, 0.2),
                    frequency: axes3(0.5, 0.5, 0.5),
                },
                jolt_probability: 0.01,
                jolt_magnitude: axes3(3.0, 3.0, 2.0),
            },
        };

        if let PatternSpec::Sine { amplitude, .. } = &mut spec {
            match position {
                DevicePosition::Flat => {}
                DevicePosition::Tilted => {
                    scale_axis(amplitude, "x", 1.5);
                    scale_axis(amplitude, "y", 0.8);
                }
                DevicePosition::Vertical => {
                    scale_axis(amplitude, "z", 0.5);
                    scale_axis(amplitude, "x", 1.2);
                    scale_axis(amplitude, "y", 1.2);
                }
                DevicePosition::UpsideDown => {
                    scale_axis(amplitude, "z", -1.0);
                }
            }
        }

        Some(spec)
    }
}

fn scale_axis(map: &mut BTreeMap<String, f64>, axis: &str, factor: f64) {
    if let Some(value) = map.get_mut(axis) {
        *value *= factor;
    }
}

/// Declarative description of a simulated device's sensor suite.
///
/// Immutable once a simulation starts: the engine hands the worker its own
/// reference and later profile loads only affect the next run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorProfile {
    /// Device class this profile models.
    pub device_type: DeviceType,
    /// Activity the device's owner is performing.
    #[serde(default = "default_activity")]
    pub activity_type: ActivityType,
    /// Physical orientation of the device.
    #[serde(default = "default_position")]
    pub position: DevicePosition,
    /// Sensor suite, keyed by sensor name.
    pub sensors: BTreeMap<String, SensorSpec>,
    /// Loop parameters and activity patterns.
    #[serde(rename = "simulation_parameters", default)]
    pub simulation: SimulationParameters,
}

fn default_activity() -> ActivityType {
    ActivityType::Stationary
}

fn default_position() -> DevicePosition {
    DevicePosition::Flat
}

impl SensorProfile {
    /// Build a profile from the per-device table, with the rule-based
    /// pattern for the given activity and position.
    pub fn for_device(
        device: DeviceType,
        activity: ActivityType,
        position: DevicePosition,
    ) -> Self {
        let mut profile = Self {
            device_type: device,
            activity_type: activity,
            position,
            sensors: device_sensor_table(device),
            simulation: SimulationParameters::default(),
        };
        profile.apply_activity(activity, position);
        profile
    }

    /// Build a profile that delegates motion patterns to the injected
    /// learned-pattern provider for the three inertial sensors.
    ///
    /// When no provider is installed, or the provider errors, each tick
    /// silently degrades to the rule-based pattern for the same activity
    /// and position.
    pub fn for_device_external(
        device: DeviceType,
        activity: ActivityType,
        position: DevicePosition,
    ) -> Self {
        let mut profile = Self {
            device_type: device,
            activity_type: activity,
            position,
            sensors: device_sensor_table(device),
            simulation: SimulationParameters::default(),
        };
        for sensor in ["accelerometer", "gyroscope", "magnetometer"] {
            profile.simulation.patterns.insert(
                sensor.to_string(),
                PatternSpec::External { activity, position },
            );
        }
        profile
    }

    fn apply_activity(&mut self, activity: ActivityType, position: DevicePosition) {
        let (accel_scale, gyro_scale) = match activity {
            ActivityType::Stationary => (1.0, 1.0),
            ActivityType::Walking => (3.0, 2.5),
            ActivityType::Running => (6.0, 5.0),
            ActivityType::Driving => (2.0, 1.5),
        };

        self.scale_variance("accelerometer", accel_scale);
        self.scale_variance("gyroscope", gyro_scale);

        if let Some(pattern) = PatternSpec::rule_based(activity, position) {
            self.simulation
                .patterns
                .insert("accelerometer".to_string(), pattern);
        }
    }

    fn scale_variance(&mut self, sensor: &str, factor: f64) {
        if factor == 1.0 {
            return;
        }
        if let Some(spec) = self.sensors.get_mut(sensor) {
            if let Some(variance) = &mut spec.variance {
                for value in variance.values_mut() {
                    *value *= factor;
                }
            }
        }
    }

    /// Names of all enabled sensors, in stable order.
    pub fn enabled_sensors(&self) -> impl Iterator<Item = &str> {
        self.sensors
            .iter()
            .filter(|(_, spec)| spec.enabled)
            .map(|(name, _)| name.as_str())
    }
}

fn device_sensor_table(device: DeviceType) -> BTreeMap<String, SensorSpec> {
    let mut sensors = BTreeMap::new();
    match device {
        DeviceType::Smartphone => {
            sensors.insert(
                "accelerometer".to_string(),
                SensorSpec::new(true, axes3(0.0, 0.0, 9.81), axes3(0.1, 0.1, 0.1)),
            );
            sensors.insert(
                "gyroscope".to_string(),
                SensorSpec::new(true, axes3(0.0, 0.0, 0.0), axes3(0.02, 0.02, 0.02)),
            );
            sensors.insert(
                "magnetometer".to_string(),
                SensorSpec::new(true, axes3(25.0, 10.0, 40.0), axes3(2.0, 2.0, 2.0)),
            );
            sensors.insert(
                "proximity".to_string(),
                SensorSpec::new(true, axis("distance", 100.0), axis("distance", 0.0)),
            );
            sensors.insert(
                "light".to_string(),
                SensorSpec::new(true, axis("lux", 500.0), axis("lux", 50.0)),
            );
            sensors.insert(
                "pressure".to_string(),
                SensorSpec::new(true, axis("hPa", 1013.25), axis("hPa", 0.5)),
            );
            sensors.insert(
                "temperature".to_string(),
                SensorSpec::new(true, axis("celsius", 22.0), axis("celsius", 0.5)),
            );
            sensors.insert(
                "humidity".to_string(),
                SensorSpec::new(false, axis("percent", 50.0), axis("percent", 1.0)),
            );
        }
        DeviceType::Tablet => {
            sensors.insert(
                "accelerometer".to_string(),
                SensorSpec::new(true, axes3(0.0, 0.0, 9.81), axes3(0.08, 0.08, 0.08)),
            );
            sensors.insert(
                "gyroscope".to_string(),
                SensorSpec::new(true, axes3(0.0, 0.0, 0.0), axes3(0.015, 0.015, 0.015)),
            );
            sensors.insert(
                "magnetometer".to_string(),
                SensorSpec::new(true, axes3(25.0, 10.0, 40.0), axes3(2.0, 2.0, 2.0)),
            );
            sensors.insert(
                "proximity".to_string(),
                SensorSpec::new(false, axis("distance", 100.0), axis("distance", 0.0)),
            );
            sensors.insert(
                "light".to_string(),
                SensorSpec::new(true, axis("lux", 500.0), axis("lux", 50.0)),
            );
            sensors.insert(
                "pressure".to_string(),
                SensorSpec::new(false, axis("hPa", 1013.25), axis("hPa", 0.5)),
            );
            sensors.insert(
                "temperature".to_string(),
                SensorSpec::new(false, axis("celsius", 22.0), axis("celsius", 0.5)),
            );
            sensors.insert(
                "humidity".to_string(),
                SensorSpec::new(false, axis("percent", 50.0), axis("percent", 1.0)),
            );
        }
        DeviceType::Smartwatch => {
            sensors.insert(
                "accelerometer".to_string(),
                SensorSpec::new(true, axes3(0.0, 0.0, 9.81), axes3(0.15, 0.15, 0.15)),
            );
            sensors.insert(
                "gyroscope".to_string(),
                SensorSpec::new(true, axes3(0.0, 0.0, 0.0), axes3(0.03, 0.03, 0.03)),
            );
            sensors.insert(
                "magnetometer".to_string(),
                SensorSpec::new(true, axes3(25.0, 10.0, 40.0), axes3(3.0, 3.0, 3.0)),
            );
            sensors.insert(
                "proximity".to_string(),
                SensorSpec::new(true, axis("distance", 100.0), axis("distance", 0.0)),
            );
            sensors.insert(
                "light".to_string(),
                SensorSpec::new(true, axis("lux", 500.0), axis("lux", 50.0)),
            );
            sensors.insert(
                "pressure".to_string(),
                SensorSpec::new(false, axis("hPa", 1013.25), axis("hPa", 0.5)),
            );
            // Wrist contact keeps the reading above ambient.
            sensors.insert(
                "temperature".to_string(),
                SensorSpec::new(true, axis("celsius", 32.0), axis("celsius", 0.3)),
            );
            sensors.insert(
                "humidity".to_string(),
                SensorSpec::new(false, axis("percent", 50.0), axis("percent", 1.0)),
            );
        }
    }
    sensors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walking_profile_installs_sine_pattern() {
        let profile = SensorProfile::for_device(
            DeviceType::Smartphone,
            ActivityType::Walking,
            DevicePosition::Flat,
        );
        match profile.simulation.patterns.get("accelerometer") {
            Some(PatternSpec::Sine {
                amplitude,
                frequency,
                phase,
            }) => {
                assert_eq!(amplitude.get("y"), Some(&1.2));
                assert_eq!(frequency.get("x"), Some(&1.8));
                assert!((phase.get("y").unwrap() - FRAC_PI_2).abs() < 1e-12);
            }
            other => panic!("expected sine pattern, got {:?}", other),
        }
    }

    #[test]
    fn walking_scales_inertial_variances() {
        let profile = SensorProfile::for_device(
            DeviceType::Smartphone,
            ActivityType::Walking,
            DevicePosition::Flat,
        );
        let accel = profile.sensors.get("accelerometer").unwrap();
        let var = accel.variance.as_ref().unwrap();
        assert!((var.get("x").unwrap() - 0.3).abs() < 1e-12);
        let gyro = profile.sensors.get("gyroscope").unwrap();
        let var = gyro.variance.as_ref().unwrap();
        assert!((var.get("z").unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn upside_down_inverts_vertical_amplitude() {
        let pattern =
            PatternSpec::rule_based(ActivityType::Walking, DevicePosition::UpsideDown).unwrap();
        match pattern {
            PatternSpec::Sine { amplitude, .. } => {
                assert_eq!(amplitude.get("z"), Some(&-1.5));
            }
            other => panic!("expected sine pattern, got {:?}", other),
        }
    }

    #[test]
    fn stationary_has_no_pattern() {
        assert!(PatternSpec::rule_based(ActivityType::Stationary, DevicePosition::Flat).is_none());
        let profile = SensorProfile::for_device(
            DeviceType::Tablet,
            ActivityType::Stationary,
            DevicePosition::Flat,
        );
        assert!(profile.simulation.patterns.is_empty());
    }

    #[test]
    fn external_profile_delegates_inertial_sensors() {
        let profile = SensorProfile::for_device_external(
            DeviceType::Smartphone,
            ActivityType::Running,
            DevicePosition::Vertical,
        );
        for sensor in ["accelerometer", "gyroscope", "magnetometer"] {
            match profile.simulation.patterns.get(sensor) {
                Some(PatternSpec::External { activity, position }) => {
                    assert_eq!(*activity, ActivityType::Running);
                    assert_eq!(*position, DevicePosition::Vertical);
                }
                other => panic!("expected external pattern for {}, got {:?}", sensor, other),
            }
        }
    }

    #[test]
    fn sparse_document_deserializes_with_defaults() {
        let doc = r#"{
            "device_type": "smartphone",
            "sensors": {
                "proximity": { "enabled": true }
            }
        }"#;
        let profile: SensorProfile = serde_json::from_str(doc).unwrap();
        assert_eq!(profile.activity_type, ActivityType::Stationary);
        assert_eq!(profile.position, DevicePosition::Flat);
        assert!((profile.simulation.noise_factor - 0.05).abs() < 1e-12);
        assert!((profile.simulation.update_frequency - 50.0).abs() < 1e-12);
        assert!(!profile.simulation.drift_enabled);
        let proximity = profile.sensors.get("proximity").unwrap();
        assert!(proximity.enabled);
        assert!(proximity.baseline.is_none());
    }

    #[test]
    fn legacy_ml_generated_tag_is_accepted() {
        let doc = r#"{
            "type": "ml_generated",
            "activity": "walking",
            "position": "flat"
        }"#;
        let spec: PatternSpec = serde_json::from_str(doc).unwrap();
        match spec {
            PatternSpec::External { activity, position } => {
                assert_eq!(activity, ActivityType::Walking);
                assert_eq!(position, DevicePosition::Flat);
            }
            other => panic!("expected external pattern, got {:?}", other),
        }
    }

    #[test]
    fn pattern_round_trips_through_json() {
        let pattern = PatternSpec::rule_based(ActivityType::Driving, DevicePosition::Flat).unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        assert!(json.contains("\"type\":\"mixed\""));
        let back: PatternSpec = serde_json::from_str(&json).unwrap();
        match back {
            PatternSpec::Mixed {
                jolt_probability, ..
            } => assert!((jolt_probability - 0.01).abs() < 1e-12),
            other => panic!("expected mixed pattern, got {:?}", other),
        }
    }
}
