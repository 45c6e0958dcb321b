//! Lifecycle tests exercising the public engine API end to end.

use std::thread::sleep;
use std::time::Duration;

use sensorloom::{
    ActivityType, DevicePosition, DeviceType, EngineError, PatternProvider, SensorEngine,
    SensorProfile,
};

fn walking_phone() -> SensorProfile {
    SensorProfile::for_device(
        DeviceType::Smartphone,
        ActivityType::Walking,
        DevicePosition::Flat,
    )
}

#[test]
fn start_without_profile_is_rejected() {
    let engine = SensorEngine::new();
    match engine.start() {
        Err(EngineError::NoProfileLoaded) => {}
        other => panic!("expected NoProfileLoaded, got {:?}", other),
    }
    assert!(!engine.is_running());
    assert!(engine.current_values().is_empty());
}

#[test]
fn stop_without_start_is_rejected() {
    let engine = SensorEngine::new();
    match engine.stop() {
        Err(EngineError::NotRunning) => {}
        other => panic!("expected NotRunning, got {:?}", other),
    }
}

#[test]
fn second_start_is_rejected_while_running() {
    let engine = SensorEngine::new();
    engine.set_seed(21);
    engine.load_profile(walking_phone());

    engine.start().expect("first start succeeds");
    match engine.start() {
        Err(EngineError::AlreadyRunning) => {}
        other => panic!("expected AlreadyRunning, got {:?}", other),
    }
    assert!(engine.is_running());

    engine.stop().expect("stop succeeds");
    assert!(!engine.is_running());
    match engine.stop() {
        Err(EngineError::NotRunning) => {}
        other => panic!("expected NotRunning, got {:?}", other),
    }
}

#[test]
fn enabled_sensors_appear_and_disabled_ones_do_not() {
    let engine = SensorEngine::new();
    engine.set_seed(7);
    engine.load_profile(walking_phone());
    engine.start().expect("start succeeds");

    // 50 Hz ticks; half a second is plenty for many commits.
    sleep(Duration::from_millis(500));
    let values = engine.current_values();
    engine.stop().expect("stop succeeds");

    for sensor in [
        "accelerometer",
        "gyroscope",
        "magnetometer",
        "proximity",
        "light",
        "pressure",
        "temperature",
    ] {
        assert!(values.contains_key(sensor), "{} missing from snapshot", sensor);
    }
    // Smartphones carry humidity as a disabled sensor; it must never show up.
    assert!(!values.contains_key("humidity"));

    let accel = &values["accelerometer"];
    for axis in ["x", "y", "z"] {
        assert!(accel[axis].is_finite());
    }
}

#[test]
fn engine_restarts_after_stop() {
    let engine = SensorEngine::new();
    engine.load_profile(walking_phone());

    engine.start().expect("first run starts");
    sleep(Duration::from_millis(100));
    engine.stop().expect("first run stops");

    engine.start().expect("second run starts");
    sleep(Duration::from_millis(200));
    let values = engine.current_values();
    engine.stop().expect("second run stops");

    assert!(values.contains_key("accelerometer"));
}

struct AlwaysFailing;

impl PatternProvider for AlwaysFailing {
    fn generate(
        &mut self,
        _sensor: &str,
        _activity: ActivityType,
        _position: DevicePosition,
        _pattern_time: f64,
    ) -> anyhow::Result<(f64, f64, f64)> {
        anyhow::bail!("inference backend offline")
    }
}

#[test]
fn failing_provider_never_surfaces_to_the_caller() {
    let engine = SensorEngine::new();
    engine.set_seed(3);
    engine.set_pattern_provider(Box::new(AlwaysFailing));
    engine.load_profile(SensorProfile::for_device_external(
        DeviceType::Smartphone,
        ActivityType::Running,
        DevicePosition::Vertical,
    ));

    engine.start().expect("start succeeds despite broken provider");
    sleep(Duration::from_millis(500));
    let values = engine.current_values();
    engine.stop().expect("stop succeeds");

    // The run degraded to rule-based patterns; values kept flowing.
    assert!(values.contains_key("accelerometer"));
    assert!(values.contains_key("gyroscope"));
    for axes in values.values() {
        for value in axes.values() {
            assert!(value.is_finite());
        }
    }
}
