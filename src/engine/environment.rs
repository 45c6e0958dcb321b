// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! Randomly evolving ambient context shared by all sensors
//!
//! The simulation worker re-rolls an [`EnvironmentState`] at random
//! intervals and recomputes per-sensor contributions from the current state
//! on every tick. Contributions are expressed as offsets from each sensor's
//! nominal baseline so the tick composition can add them uniformly: a device
//! lying flat and unmoving contributes exactly zero to its accelerometer,
//! while a pressure sensor's contribution shifts its reading to the ambient
//! pressure of the moment.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::profile::{axes3, DevicePosition};

const GRAVITY: f64 = 9.81;

const NOMINAL_LUX: f64 = 500.0;
const NOMINAL_PRESSURE: f64 = 1013.25;
const NOMINAL_TEMPERATURE: f64 = 22.0;
const NOMINAL_HUMIDITY: f64 = 50.0;
const PROXIMITY_FAR: f64 = 100.0;

/// Ambient lighting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    Dark,
    Dim,
    Normal,
    Bright,
    VeryBright,
}

/// How much the device is being moved around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    None,
    Slight,
    Moderate,
    Significant,
}

/// One sampled ambient context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Ambient lighting level.
    pub lighting: Lighting,
    /// Movement intensity.
    pub movement: Movement,
    /// Device orientation.
    pub position: DevicePosition,
    /// Ambient temperature in Celsius.
    pub temperature: f64,
    /// Ambient pressure in hPa.
    pub pressure: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Normalized magnetic interference level.
    pub magnetic_interference: f64,
}

impl EnvironmentState {
    /// Sample a fresh ambient context.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let lighting = match rng.gen_range(0..5) {
            0 => Lighting::Dark,
            1 => Lighting::Dim,
            2 => Lighting::Normal,
            3 => Lighting::Bright,
            _ => Lighting::VeryBright,
        };
        let movement = match rng.gen_range(0..4) {
            0 => Movement::None,
            1 => Movement::Slight,
            2 => Movement::Moderate,
            _ => Movement::Significant,
        };
        let position = match rng.gen_range(0..4) {
            0 => DevicePosition::Flat,
            1 => DevicePosition::Tilted,
            2 => DevicePosition::Vertical,
            _ => DevicePosition::UpsideDown,
        };
        Self {
            lighting,
            movement,
            position,
            temperature: rng.gen_range(15.0..35.0),
            pressure: rng.gen_range(980.0..1030.0),
            humidity: rng.gen_range(20.0..80.0),
            magnetic_interference: rng.gen_range(0.0..1.0),
        }
    }

    /// Offset this context applies to one sensor, per axis.
    pub fn contribution(&self, sensor: &str, rng: &mut impl Rng) -> BTreeMap<String, f64> {
        match sensor {
            "accelerometer" => self.accelerometer_contribution(rng),
            "gyroscope" => self.gyroscope_contribution(rng),
            "magnetometer" => self.magnetometer_contribution(rng),
            "light" => self.light_contribution(rng),
            "proximity" => self.proximity_contribution(rng),
            "pressure" => {
                let mut out = BTreeMap::new();
                out.insert("hPa".to_string(), self.pressure - NOMINAL_PRESSURE);
                out
            }
            "temperature" => {
                let mut out = BTreeMap::new();
                out.insert("celsius".to_string(), self.temperature - NOMINAL_TEMPERATURE);
                out
            }
            "humidity" => {
                let mut out = BTreeMap::new();
                out.insert("percent".to_string(), self.humidity - NOMINAL_HUMIDITY);
                out
            }
            _ => BTreeMap::new(),
        }
    }

    fn accelerometer_contribution(&self, rng: &mut impl Rng) -> BTreeMap<String, f64> {
        // Gravity decomposition relative to the flat nominal (0, 0, g).
        let mut out = match self.position {
            DevicePosition::Flat => axes3(0.0, 0.0, 0.0),
            DevicePosition::Tilted => {
                let tilt = rng.gen_range(0.0..45.0f64).to_radians();
                let azimuth = rng.gen_range(0.0..TAU);
                gravity_delta(tilt, azimuth)
            }
            DevicePosition::Vertical => {
                let tilt = rng.gen_range(80.0..100.0f64).to_radians();
                let azimuth = rng.gen_range(0.0..TAU);
                gravity_delta(tilt, azimuth)
            }
            DevicePosition::UpsideDown => axes3(0.0, 0.0, -2.0 * GRAVITY),
        };

        let amplitude = match self.movement {
            Movement::None => 0.0,
            Movement::Slight => 0.2,
            Movement::Moderate => 0.5,
            Movement::Significant => 1.0,
        };
        if amplitude > 0.0 {
            for value in out.values_mut() {
                *value += rng.gen_range(-amplitude..amplitude);
            }
        }
        out
    }

    fn gyroscope_contribution(&self, rng: &mut impl Rng) -> BTreeMap<String, f64> {
        let amplitude = match self.movement {
            Movement::None => return axes3(0.0, 0.0, 0.0),
            Movement::Slight => 0.1,
            Movement::Moderate => 0.3,
            Movement::Significant => 0.8,
        };
        axes3(
            rng.gen_range(-amplitude..amplitude),
            rng.gen_range(-amplitude..amplitude),
            rng.gen_range(-amplitude..amplitude),
        )
    }

    fn magnetometer_contribution(&self, rng: &mut impl Rng) -> BTreeMap<String, f64> {
        let interference = self.magnetic_interference;
        axes3(
            interference * rng.gen_range(-10.0..10.0),
            interference * rng.gen_range(-10.0..10.0),
            interference * rng.gen_range(-10.0..10.0),
        )
    }

    fn light_contribution(&self, rng: &mut impl Rng) -> BTreeMap<String, f64> {
        let lux = match self.lighting {
            Lighting::Dark => rng.gen_range(0.0..10.0),
            Lighting::Dim => rng.gen_range(10.0..100.0),
            Lighting::Normal => rng.gen_range(100.0..500.0),
            Lighting::Bright => rng.gen_range(500.0..2000.0),
            Lighting::VeryBright => rng.gen_range(2000.0..10000.0),
        };
        let mut out = BTreeMap::new();
        out.insert("lux".to_string(), lux - NOMINAL_LUX);
        out
    }

    fn proximity_contribution(&self, rng: &mut impl Rng) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        // A stationary device occasionally has something near it, like a
        // face during a call. A moving device reads far.
        if self.movement == Movement::None && rng.gen::<f64>() < 0.1 {
            out.insert(
                "distance".to_string(),
                rng.gen_range(0.0..5.0) - PROXIMITY_FAR,
            );
        } else {
            out.insert("distance".to_string(), 0.0);
        }
        out
    }
}

fn gravity_delta(tilt: f64, azimuth: f64) -> BTreeMap<String, f64> {
    axes3(
        GRAVITY * tilt.sin() * azimuth.cos(),
        GRAVITY * tilt.sin() * azimuth.sin(),
        GRAVITY * tilt.cos() - GRAVITY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn calm_state() -> EnvironmentState {
        EnvironmentState {
            lighting: Lighting::Normal,
            movement: Movement::None,
            position: DevicePosition::Flat,
            temperature: NOMINAL_TEMPERATURE,
            pressure: NOMINAL_PRESSURE,
            humidity: NOMINAL_HUMIDITY,
            magnetic_interference: 0.0,
        }
    }

    #[test]
    fn rolled_fields_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let state = EnvironmentState::roll(&mut rng);
            assert!((15.0..35.0).contains(&state.temperature));
            assert!((980.0..1030.0).contains(&state.pressure));
            assert!((20.0..80.0).contains(&state.humidity));
            assert!((0.0..1.0).contains(&state.magnetic_interference));
        }
    }

    #[test]
    fn flat_and_still_contributes_nothing_to_motion_sensors() {
        let state = calm_state();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for sensor in ["accelerometer", "gyroscope"] {
            let out = state.contribution(sensor, &mut rng);
            for (axis, value) in &out {
                assert_eq!(*value, 0.0, "{} axis {} should be zero", sensor, axis);
            }
        }
    }

    #[test]
    fn upside_down_flips_gravity() {
        let mut state = calm_state();
        state.position = DevicePosition::UpsideDown;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let out = state.contribution("accelerometer", &mut rng);
        assert_eq!(out.get("z"), Some(&(-2.0 * GRAVITY)));
    }

    #[test]
    fn tilted_gravity_preserves_magnitude() {
        let mut state = calm_state();
        state.position = DevicePosition::Tilted;
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..50 {
            let out = state.contribution("accelerometer", &mut rng);
            let x = out["x"];
            let y = out["y"];
            let z = out["z"] + GRAVITY;
            let magnitude = (x * x + y * y + z * z).sqrt();
            assert!((magnitude - GRAVITY).abs() < 1e-9);
        }
    }

    #[test]
    fn atmospheric_sensors_pass_state_through() {
        let mut state = calm_state();
        state.temperature = 30.0;
        state.pressure = 990.0;
        state.humidity = 65.0;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            state.contribution("temperature", &mut rng)["celsius"],
            30.0 - NOMINAL_TEMPERATURE
        );
        assert_eq!(
            state.contribution("pressure", &mut rng)["hPa"],
            990.0 - NOMINAL_PRESSURE
        );
        assert_eq!(
            state.contribution("humidity", &mut rng)["percent"],
            65.0 - NOMINAL_HUMIDITY
        );
    }

    #[test]
    fn lighting_bands_are_respected() {
        let mut state = calm_state();
        state.lighting = Lighting::VeryBright;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            let lux = state.contribution("light", &mut rng)["lux"] + NOMINAL_LUX;
            assert!((2000.0..10000.0).contains(&lux));
        }
    }

    #[test]
    fn moving_device_reads_far_proximity() {
        let mut state = calm_state();
        state.movement = Movement::Moderate;
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..100 {
            assert_eq!(state.contribution("proximity", &mut rng)["distance"], 0.0);
        }
    }

    #[test]
    fn unknown_sensors_get_no_contribution() {
        let state = calm_state();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(state.contribution("heart_rate", &mut rng).is_empty());
    }
}
