// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! sensorloom - Synthetic Sensor Telemetry Engine
//!
//! A continuously running generator of physically plausible multi-axis
//! sensor streams (accelerometer, gyroscope, magnetometer, proximity, light,
//! pressure, temperature, humidity) for a virtual device. Each tick combines:
//! - a declarative per-device baseline with Gaussian noise,
//! - bounded random-walk calibration drift,
//! - deterministic activity waveforms (sine, mixed, gait),
//! - a randomly evolving ambient environment model,
//! - optional learned patterns behind a pluggable provider that degrades
//!   gracefully when it misbehaves.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       SensorEngine                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌─────────────┐   ┌─────────┐   ┌─────────┐  │
//! │  │ Profile  │ → │ Simulation  │ ← │ Pattern │   │ Ambient │  │
//! │  │ + Defaults│  │ Worker      │   │ Provider│   │ Model   │  │
//! │  └──────────┘   └──────┬──────┘   └─────────┘   └─────────┘  │
//! │                        │  per-sensor commits                 │
//! │                 ┌──────▼──────┐                              │
//! │                 │  Snapshot   │ ← polled by GUI / monitors   │
//! │                 │  Store      │                              │
//! │                 └─────────────┘                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use sensorloom::{ActivityType, DevicePosition, DeviceType, SensorEngine, SensorProfile};
//!
//! let engine = SensorEngine::new();
//! engine.load_profile(SensorProfile::for_device(
//!     DeviceType::Smartphone,
//!     ActivityType::Walking,
//!     DevicePosition::Flat,
//! ));
//! engine.start().expect("engine was idle");
//!
//! let values = engine.current_values();
//! println!("accelerometer: {:?}", values.get("accelerometer"));
//!
//! engine.stop().expect("engine was running");
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod config;
pub mod engine;
pub mod profile;

// Re-exports for convenience
pub use config::Config;
pub use engine::{
    evaluate_rule, EngineError, EnvironmentState, Lighting, Movement, PatternProvider,
    SensorEngine, SnapshotStore,
};
pub use profile::{
    default_baseline, default_variance, resolve, ActivityType, DevicePosition, DeviceType,
    PatternSpec, ProfileStore, ResolvedSensor, SensorProfile, SensorSpec, SimulationParameters,
    SmoothSpec,
};

/// sensorloom version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// sensorloom name
pub const NAME: &str = "sensorloom";
