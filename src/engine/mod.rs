//! Simulation engine - scheduling loop, ambient model, drift and snapshots

mod drift;
mod environment;
mod pattern;
mod simulator;
mod snapshot;

pub use environment::{EnvironmentState, Lighting, Movement};
pub use pattern::{evaluate_rule, PatternProvider};
pub use simulator::SensorEngine;
pub use snapshot::SnapshotStore;

use thiserror::Error;

/// Lifecycle failures reported to callers.
///
/// None of these are fatal to the engine: a rejected request leaves the
/// current state untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `start` was called while a simulation is already running.
    #[error("simulation is already running")]
    AlreadyRunning,
    /// `stop` was called while no simulation is running.
    #[error("simulation is not running")]
    NotRunning,
    /// `start` was called before any profile was loaded.
    #[error("no sensor profile loaded")]
    NoProfileLoaded,
    /// The worker thread could not be spawned.
    #[error("failed to spawn simulation worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
