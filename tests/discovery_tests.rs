use std::sync::Arc;
use thermostat_sim::controller::ThermostatController;
use thermostat_sim::scenario::Scenario;
use thermostat_sim::sensor::SENSOR_CATALOG;
use thermostat_sim::shared::SharedState;
use thermostat_sim::sim::{CaptureTransport, SimBus, SimHeaterPin};

fn boot_with_sensor(
    responding: Option<usize>,
) -> (
    ThermostatController<SimBus, SimHeaterPin, CaptureTransport>,
    Arc<SharedState>,
) {
    let scenario = Scenario {
        responding_sensor: responding,
        start_temp_c: 20.0,
        frozen: true,
        ..Scenario::default()
    };
    let shared = Arc::new(SharedState::new());
    let mut controller = ThermostatController::new(
        SimBus::new(scenario),
        SimHeaterPin::new(),
        CaptureTransport::new(),
        Arc::clone(&shared),
        &SENSOR_CATALOG,
    );
    controller.start().unwrap();
    (controller, shared)
}

#[test]
fn test_discovery_selects_kth_candidate_and_stops() {
    for (k, descriptor) in SENSOR_CATALOG.iter().enumerate() {
        let (controller, _) = boot_with_sensor(Some(k));

        let active = controller.active_sensor().unwrap();
        assert_eq!(active.address, descriptor.address);
        assert_eq!(active.id, descriptor.id);

        // Exactly k failed probes before the winner, none after
        let log = controller.probe_log();
        assert_eq!(log.len(), k + 1);
        assert!(log[..k].iter().all(|record| !record.responded));
        assert!(log[k].responded);
    }
}

#[test]
fn test_discovery_emits_per_candidate_progress() {
    let (controller, _) = boot_with_sensor(Some(2));

    let lines = controller.transport().lines();
    assert_eq!(lines[0], "I2C sensor discovery");
    assert_eq!(lines[1], "  0x48 (11X)... no");
    assert_eq!(lines[2], "  0x49 (116)... no");
    assert_eq!(lines[3], "  0x41 (006)... found");
    assert_eq!(lines[4], "active sensor: 006");
}

#[test]
fn test_no_responder_reported_once_then_degraded_forever() {
    let (mut controller, shared) = boot_with_sensor(None);

    assert!(controller.active_sensor().is_none());
    assert_eq!(controller.probe_log().len(), SENSOR_CATALOG.len());

    let lines = controller.transport().lines();
    assert!(lines.contains(&"no temperature sensor found".to_owned()));

    // Every later sample surfaces a read error; the loop never retries
    // discovery and never crashes.
    for _ in 0..5 {
        shared.tick();
        controller.service().unwrap();
    }
    assert_eq!(controller.stats().samples_failed, 5);
    assert_eq!(controller.stats().samples_ok, 0);
    assert_eq!(controller.stats().telegrams_sent, 5);

    let error_lines = controller
        .transport()
        .lines()
        .into_iter()
        .filter(|line| line.contains("no active sensor"))
        .count();
    assert_eq!(error_lines, 5);
}

#[test]
fn test_active_sensor_immutable_after_discovery() {
    let (mut controller, shared) = boot_with_sensor(Some(1));
    let before = controller.active_sensor().unwrap();

    for _ in 0..3 {
        shared.tick();
        controller.service().unwrap();
    }

    let after = controller.active_sensor().unwrap();
    assert_eq!(before, after);
}
