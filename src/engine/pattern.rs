// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! Activity waveform evaluation
//!
//! Built-in waveforms are functions of accumulated pattern time. External
//! (learned) generation is a pluggable strategy behind [`PatternProvider`];
//! a provider that errors, or the absence of one, degrades to the rule-based
//! waveform for that tick without the caller ever seeing a failure.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, warn};

use crate::profile::{axes3, ActivityType, DevicePosition, PatternSpec};

/// Pluggable source of learned per-axis waveform offsets.
///
/// Implementations may keep internal state (model handles, caches); the
/// engine serializes access. Returning an error is always safe: the engine
/// falls back to the built-in waveform for that tick.
pub trait PatternProvider: Send {
    /// Produce (x, y, z) offsets for a sensor at the given pattern time.
    fn generate(
        &mut self,
        sensor: &str,
        activity: ActivityType,
        position: DevicePosition,
        pattern_time: f64,
    ) -> Result<(f64, f64, f64)>;
}

pub(crate) type ProviderHandle = Arc<Mutex<Option<Box<dyn PatternProvider>>>>;

/// Evaluate a built-in waveform at `t`.
///
/// [`PatternSpec::Sine`] consumes no randomness and is a pure function of
/// `t`; the other variants draw jitter from `rng`. [`PatternSpec::External`]
/// is not handled here and yields `None`.
pub fn evaluate_rule(
    spec: &PatternSpec,
    t: f64,
    rng: &mut impl Rng,
) -> Option<BTreeMap<String, f64>> {
    match spec {
        PatternSpec::Sine {
            amplitude,
            frequency,
            phase,
        } => {
            let mut out = BTreeMap::new();
            for (axis, amp) in amplitude {
                if let Some(freq) = frequency.get(axis) {
                    let shift = phase.get(axis).copied().unwrap_or(0.0);
                    out.insert(axis.clone(), amp * (TAU * freq * t + shift).sin());
                }
            }
            Some(out)
        }
        PatternSpec::Mixed {
            smooth,
            jolt_probability,
            jolt_magnitude,
        } => {
            let mut out = BTreeMap::new();
            for (axis, amp) in &smooth.amplitude {
                if let Some(freq) = smooth.frequency.get(axis) {
                    out.insert(axis.clone(), amp * (TAU * freq * t).sin());
                }
            }
            // Jolts are drawn fresh each tick and never persisted.
            if *jolt_probability > 0.0 && rng.gen::<f64>() < *jolt_probability {
                for (axis, magnitude) in jolt_magnitude {
                    if *magnitude > 0.0 {
                        *out.entry(axis.clone()).or_insert(0.0) +=
                            rng.gen_range(-magnitude..*magnitude);
                    }
                }
            }
            Some(out)
        }
        PatternSpec::Realistic {
            step_frequency,
            step_intensity,
        } => {
            let step_phase = (t * step_frequency) % 1.0;
            if step_phase < 0.2 {
                // Heel strike: sharp vertical spike with horizontal scatter.
                let impact = (step_phase * PI / 0.2).sin() * step_intensity;
                Some(axes3(
                    rng.gen_range(-0.2..0.2) * impact,
                    rng.gen_range(-0.2..0.2) * impact,
                    9.81 + impact * 2.0,
                ))
            } else {
                let recovery = ((step_phase - 0.2) * PI / 0.8).sin() * 0.5 * step_intensity;
                Some(axes3(
                    rng.gen_range(-0.1..0.1) * recovery,
                    rng.gen_range(-0.1..0.1) * recovery,
                    9.81 - recovery,
                ))
            }
        }
        PatternSpec::External { .. } => None,
    }
}

/// Per-run pattern evaluator owned by the simulation worker.
pub(crate) struct PatternEngine {
    provider: ProviderHandle,
    warned: BTreeSet<String>,
}

impl PatternEngine {
    pub(crate) fn new(provider: ProviderHandle) -> Self {
        Self {
            provider,
            warned: BTreeSet::new(),
        }
    }

    /// Evaluate one sensor's pattern for the current tick.
    pub(crate) fn evaluate(
        &mut self,
        sensor: &str,
        spec: &PatternSpec,
        t: f64,
        rng: &mut impl Rng,
    ) -> Option<BTreeMap<String, f64>> {
        match spec {
            PatternSpec::External { activity, position } => {
                let generated = {
                    let mut guard = self.provider.lock();
                    match guard.as_mut() {
                        Some(provider) => provider.generate(sensor, *activity, *position, t),
                        None => Err(anyhow!("no learned pattern provider installed")),
                    }
                };
                match generated {
                    Ok((x, y, z)) => Some(axes3(x, y, z)),
                    Err(err) => {
                        if self.warned.insert(sensor.to_string()) {
                            warn!(
                                "learned pattern generation failed for {}: {}; using rule-based pattern",
                                sensor, err
                            );
                        } else {
                            debug!("learned pattern generation failed for {}: {}", sensor, err);
                        }
                        PatternSpec::rule_based(*activity, *position)
                            .as_ref()
                            .and_then(|fallback| evaluate_rule(fallback, t, rng))
                    }
                }
            }
            other => evaluate_rule(other, t, rng),
        }
    }
}
