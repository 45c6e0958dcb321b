// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! sensorloom - Synthetic Sensor Telemetry Engine
//!
//! Runs the telemetry engine for a chosen device/activity/position triple
//! (or a stored profile) and polls the snapshot at a consumer-side cadence,
//! decoupled from the engine's own tick rate.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sensorloom::{
    ActivityType, Config, DevicePosition, DeviceType, ProfileStore, SensorEngine, SensorProfile,
    VERSION,
};

/// sensorloom - Synthetic Sensor Telemetry Engine
#[derive(Parser, Debug)]
#[command(name = "sensorloom")]
#[command(author = "sensorloom project")]
#[command(version = VERSION)]
#[command(about = "Physically plausible synthetic sensor streams for virtual devices")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device type to simulate
    #[arg(long, default_value = "smartphone")]
    device: DeviceType,

    /// Activity shaping the motion sensors
    #[arg(long, default_value = "stationary")]
    activity: ActivityType,

    /// Physical position of the device
    #[arg(long, default_value = "flat")]
    position: DevicePosition,

    /// Delegate motion patterns to the learned-pattern provider
    #[arg(long)]
    learned: bool,

    /// Load a stored profile instead of building one
    #[arg(long)]
    profile: Option<String>,

    /// Save the effective profile under this name before starting
    #[arg(long)]
    save_profile: Option<String>,

    /// List stored profiles and exit
    #[arg(long)]
    list_profiles: bool,

    /// Fixed random seed for a reproducible stream
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds (runs until Ctrl+C otherwise)
    #[arg(long)]
    duration: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("sensorloom v{} - Synthetic Sensor Telemetry Engine", VERSION);

    // Load or create configuration
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_create(&config_path)?;

    let store = ProfileStore::open(&config.profile_dir)?;

    if args.list_profiles {
        let names = store.list()?;
        if names.is_empty() {
            info!("No stored profiles in {:?}", store.dir());
        }
        for name in names {
            info!("profile: {}", name);
        }
        return Ok(());
    }

    let profile = match &args.profile {
        Some(name) => store.load(name)?,
        None if args.learned => {
            SensorProfile::for_device_external(args.device, args.activity, args.position)
        }
        None => SensorProfile::for_device(args.device, args.activity, args.position),
    };

    if let Some(name) = &args.save_profile {
        store.save(name, &profile)?;
    }

    let engine = SensorEngine::new();
    if let Some(seed) = args.seed.or(config.seed) {
        info!("Using fixed random seed {}", seed);
        engine.set_seed(seed);
    }
    engine.load_profile(profile);
    engine.start()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(monitor(&engine, &config, args.duration))?;

    engine.stop()?;
    info!("sensorloom shutdown complete");
    Ok(())
}

/// Poll the snapshot until Ctrl+C or the optional deadline.
async fn monitor(engine: &SensorEngine, config: &Config, duration: Option<u64>) -> Result<()> {
    let poll_hz = if config.monitor.poll_hz > 0.0 {
        config.monitor.poll_hz
    } else {
        warn!("invalid monitor poll rate, falling back to 10 Hz");
        10.0
    };
    let mut poll = tokio::time::interval(Duration::from_secs_f64(1.0 / poll_hz));

    let deadline = async {
        match duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Monitoring snapshot at {:.1} Hz; press Ctrl+C to stop", poll_hz);
    loop {
        tokio::select! {
            _ = poll.tick() => {
                let values = engine.current_values();
                if let Some(axes) = values.get(&config.monitor.log_sensor) {
                    let formatted: Vec<String> = axes
                        .iter()
                        .map(|(axis, value)| format!("{}={:.4}", axis, value))
                        .collect();
                    info!("{}: {}", config.monitor.log_sensor, formatted.join(" "));
                }
            }
            _ = &mut deadline => {
                info!("Run duration reached");
                break;
            }
            _ = &mut ctrl_c => {
                info!("Shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}
