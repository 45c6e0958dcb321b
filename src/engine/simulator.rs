// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! The simulation engine and its fixed-rate worker loop
//!
//! [`SensorEngine`] owns the Idle/Running lifecycle. A successful `start`
//! resolves the loaded profile, seeds the generator state and spawns exactly
//! one worker thread; `stop` signals the worker cooperatively and waits a
//! bounded time for confirmation. All generator state (drift, environment,
//! pattern time) is confined to the worker; the snapshot store is the only
//! surface shared with readers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use tracing::{debug, info, warn};

use crate::profile::{resolve, ResolvedSensor, SensorProfile, SimulationParameters};

use super::drift::DriftTracker;
use super::environment::EnvironmentState;
use super::pattern::{PatternEngine, PatternProvider, ProviderHandle};
use super::snapshot::SnapshotStore;
use super::EngineError;

/// How long `stop` waits for the worker to confirm shutdown.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Bounds of the random interval between environment re-rolls, in seconds.
const ENV_ROLL_MIN_SECS: f64 = 5.0;
const ENV_ROLL_MAX_SECS: f64 = 30.0;

/// Continuously running synthetic telemetry generator for one virtual device.
pub struct SensorEngine {
    state: Mutex<EngineState>,
    snapshot: SnapshotStore,
    provider: ProviderHandle,
}

#[derive(Default)]
struct EngineState {
    profile: Option<Arc<SensorProfile>>,
    seed: Option<u64>,
    worker: Option<WorkerHandle>,
}

struct WorkerHandle {
    running: Arc<AtomicBool>,
    done: Receiver<()>,
    thread: thread::JoinHandle<()>,
}

impl SensorEngine {
    /// A fresh engine with no profile loaded.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            snapshot: SnapshotStore::new(),
            provider: Arc::new(Mutex::new(None)),
        }
    }

    /// Stage a profile for the next run.
    ///
    /// A running simulation keeps the profile it started with; the new one
    /// takes effect on the next `start`.
    pub fn load_profile(&self, profile: SensorProfile) {
        let mut state = self.state.lock();
        info!(
            "Loaded {} profile ({} activity, {} position, {} enabled sensors)",
            profile.device_type,
            profile.activity_type,
            profile.position,
            profile.enabled_sensors().count()
        );
        state.profile = Some(Arc::new(profile));
    }

    /// Seed the per-run random generator for reproducible streams.
    pub fn set_seed(&self, seed: u64) {
        self.state.lock().seed = Some(seed);
    }

    /// Install a learned-pattern provider for `External` pattern specs.
    pub fn set_pattern_provider(&self, provider: Box<dyn PatternProvider>) {
        *self.provider.lock() = Some(provider);
    }

    /// Whether a worker is currently running.
    pub fn is_running(&self) -> bool {
        self.state.lock().worker.is_some()
    }

    /// The most recently committed sensor values.
    pub fn current_values(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.snapshot.current_values()
    }

    /// Start the simulation loop.
    ///
    /// Fails without side effects when already running or when no profile
    /// has been loaded.
    pub fn start(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if state.worker.is_some() {
            warn!("start requested while simulation is already running");
            return Err(EngineError::AlreadyRunning);
        }
        let profile = state.profile.clone().ok_or(EngineError::NoProfileLoaded)?;

        let rng = match state.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        self.snapshot.clear();
        let worker = SimulationWorker::new(
            &profile,
            self.snapshot.clone(),
            Arc::clone(&self.provider),
            rng,
        );
        let sensor_count = worker.sensors.len();
        let frequency = 1.0 / worker.tick_interval.as_secs_f64();

        let running = Arc::new(AtomicBool::new(true));
        let (done_tx, done_rx) = bounded(1);
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("sensorloom-sim".to_string())
            .spawn(move || worker.run(flag, done_tx))?;

        state.worker = Some(WorkerHandle {
            running,
            done: done_rx,
            thread: handle,
        });
        info!(
            "Sensor simulation started: {} sensors at {:.1} Hz",
            sensor_count, frequency
        );
        Ok(())
    }

    /// Stop the simulation loop.
    ///
    /// Signals the worker at the next tick boundary and waits up to two
    /// seconds for confirmation. Fails when no simulation is running.
    pub fn stop(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        let handle = state.worker.take().ok_or_else(|| {
            warn!("stop requested while simulation is not running");
            EngineError::NotRunning
        })?;

        handle.running.store(false, Ordering::Relaxed);
        match handle.done.recv_timeout(STOP_TIMEOUT) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.thread.join();
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "simulation worker did not confirm shutdown within {:?}",
                    STOP_TIMEOUT
                );
            }
        }
        info!("Sensor simulation stopped");
        Ok(())
    }
}

impl Default for SensorEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker-confined simulation state; drives one tick at a time.
pub(crate) struct SimulationWorker {
    sensors: Vec<ResolvedSensor>,
    params: SimulationParameters,
    snapshot: SnapshotStore,
    patterns: PatternEngine,
    drift: DriftTracker,
    pub(crate) environment: EnvironmentState,
    pattern_time: f64,
    tick_interval: Duration,
    rng: ChaCha8Rng,
    last_roll: Instant,
    next_roll: Duration,
}

impl SimulationWorker {
    pub(crate) fn new(
        profile: &SensorProfile,
        snapshot: SnapshotStore,
        provider: ProviderHandle,
        mut rng: ChaCha8Rng,
    ) -> Self {
        let sensors: Vec<ResolvedSensor> = profile
            .sensors
            .iter()
            .filter(|(_, spec)| spec.enabled)
            .map(|(name, spec)| resolve(name, spec))
            .collect();

        let params = profile.simulation.clone();
        let frequency = if params.update_frequency > 0.0 {
            params.update_frequency
        } else {
            warn!(
                "invalid update frequency {}, falling back to 50 Hz",
                params.update_frequency
            );
            50.0
        };

        let drift = DriftTracker::new(&sensors);
        let environment = EnvironmentState::roll(&mut rng);
        let next_roll = roll_interval(&mut rng);

        Self {
            sensors,
            params,
            snapshot,
            patterns: PatternEngine::new(provider),
            drift,
            environment,
            pattern_time: 0.0,
            tick_interval: Duration::from_secs_f64(1.0 / frequency),
            rng,
            last_roll: Instant::now(),
            next_roll,
        }
    }

    /// One full pass: environment upkeep, per-sensor value composition,
    /// pattern-time advance. Sleeping is the caller's concern.
    pub(crate) fn tick(&mut self) {
        if self.last_roll.elapsed() >= self.next_roll {
            self.environment = EnvironmentState::roll(&mut self.rng);
            self.next_roll = roll_interval(&mut self.rng);
            self.last_roll = Instant::now();
            debug!(
                "environment re-rolled: {:?} lighting, {:?} movement, {:?} position",
                self.environment.lighting, self.environment.movement, self.environment.position
            );
        }

        for sensor in &self.sensors {
            let pattern = self.params.patterns.get(&sensor.name).and_then(|spec| {
                self.patterns
                    .evaluate(&sensor.name, spec, self.pattern_time, &mut self.rng)
            });
            let ambient = self.environment.contribution(&sensor.name, &mut self.rng);

            if self.params.drift_enabled {
                for axis in sensor.baseline.keys() {
                    self.drift
                        .step(&sensor.name, axis, self.params.drift_factor, &mut self.rng);
                }
            }

            let mut values = BTreeMap::new();
            for (axis, base) in &sensor.baseline {
                let sigma = sensor.variance.get(axis).copied().unwrap_or(0.0)
                    * self.params.noise_factor;
                let noise = if sigma > 0.0 {
                    Normal::new(0.0, sigma)
                        .map(|dist| self.rng.sample(dist))
                        .unwrap_or(0.0)
                } else {
                    0.0
                };
                let pattern_offset = pattern
                    .as_ref()
                    .and_then(|offsets| offsets.get(axis))
                    .copied()
                    .unwrap_or(0.0);
                let ambient_offset = ambient.get(axis).copied().unwrap_or(0.0);
                let drift = self.drift.value(&sensor.name, axis);

                values.insert(
                    axis.clone(),
                    base + noise + pattern_offset + ambient_offset + drift,
                );
            }
            self.snapshot.commit(&sensor.name, values);
        }

        self.pattern_time += self.tick_interval.as_secs_f64();
    }

    /// Tick until the running flag clears, then confirm shutdown.
    pub(crate) fn run(mut self, running: Arc<AtomicBool>, done: Sender<()>) {
        debug!(
            "simulation worker online: {} sensors every {:?}",
            self.sensors.len(),
            self.tick_interval
        );
        while running.load(Ordering::Relaxed) {
            let started = Instant::now();
            self.tick();
            let elapsed = started.elapsed();
            if elapsed < self.tick_interval {
                thread::sleep(self.tick_interval - elapsed);
            }
        }
        let _ = done.send(());
        debug!("simulation worker offline");
    }
}

fn roll_interval(rng: &mut impl Rng) -> Duration {
    Duration::from_secs_f64(rng.gen_range(ENV_ROLL_MIN_SECS..ENV_ROLL_MAX_SECS))
}
