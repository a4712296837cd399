//! Integration tests for the AppService → sensors → FSM → outputs pipeline.
//!
//! These run on the host and drive the full tick through mock adapters on
//! a virtual clock.

use crate::mock_hw::Rig;

use firewatch::app::events::AppEvent;
use firewatch::app::ports::Output;
use firewatch::error::SensorError;
use firewatch::fsm::RiskLevel;
use firewatch::sensors::OperatingMode;
use firewatch::sensors::temperature::ReadingSource;

// ── Risk classification ───────────────────────────────────────

#[test]
fn thresholds_drive_risk_level() {
    let mut rig = Rig::new();
    let expected = [
        (49.9, RiskLevel::Normal),
        (50.0, RiskLevel::Warning),
        (59.9, RiskLevel::Warning),
        (60.0, RiskLevel::Danger),
        (55.0, RiskLevel::Warning),
        (25.0, RiskLevel::Normal),
        (65.0, RiskLevel::Danger),
    ];
    for (t, level) in expected {
        rig.reading(t);
        assert_eq!(rig.app.level(), level, "at {t}");
    }

    let stats = rig.app.stats();
    assert_eq!(stats.total_readings, 7);
    assert_eq!(stats.warning_entries, 2);
    assert_eq!(stats.danger_entries, 2);
}

#[test]
fn transitions_emit_risk_changed_once() {
    let mut rig = Rig::new();
    rig.readings(&[55.0, 56.0, 57.0]);
    let changes: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RiskChanged { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, [(RiskLevel::Normal, RiskLevel::Warning)]);
}

#[test]
fn presence_alert_needs_elevated_risk() {
    let mut rig = Rig::new();
    rig.hw.motion = true;
    rig.reading(25.0);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PresenceAlert { .. })), 0);

    rig.reading(55.0);
    rig.reading(70.0);
    let alerts: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PresenceAlert { level } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(alerts, [RiskLevel::Warning, RiskLevel::Danger]);
    assert_eq!(rig.app.level(), RiskLevel::Danger, "presence never changes state");
}

// ── Sensor validation ─────────────────────────────────────────

#[test]
fn rejected_reading_keeps_previous_value() {
    let mut rig = Rig::new();
    rig.reading(30.0);
    rig.reading(200.0);

    assert_eq!(rig.app.temperature_c(), 30.0);
    assert_eq!(rig.app.sensor_health().consecutive_errors, 1);
    assert_eq!(rig.app.stats().sensor_errors, 1);
    let reading = rig.app.last_reading().unwrap();
    assert_eq!(reading.source, ReadingSource::Substituted);
    assert_eq!(reading.raw_c, Some(200.0));
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ReadingRejected {
            error: SensorError::OutOfRange,
            consecutive_errors: 1,
            ..
        }
    )));

    rig.reading(31.0);
    assert_eq!(rig.app.temperature_c(), 31.0);
    assert_eq!(rig.app.sensor_health().consecutive_errors, 0);
}

#[test]
fn first_failure_substitutes_initial_value() {
    let mut rig = Rig::new();
    rig.failed_reading();
    assert_eq!(rig.app.temperature_c(), 25.0);
    assert_eq!(rig.app.level(), RiskLevel::Normal);
    assert_eq!(rig.app.last_reading().unwrap().raw_c, None);
}

#[test]
fn integrity_lost_at_ceiling_and_restored_by_valid_reading() {
    let mut rig = Rig::new();
    rig.reading(30.0);
    for _ in 0..4 {
        rig.reading(-40.0);
    }
    assert!(rig.app.sensor_health().integrity_ok);

    rig.failed_reading();
    assert!(!rig.app.sensor_health().integrity_ok);
    assert_eq!(rig.app.sensor_health().consecutive_errors, 5);
    assert_eq!(rig.app.stats().security_alerts, 1);

    // The counter keeps climbing; the alert is not repeated.
    rig.reading(99.0);
    assert_eq!(rig.app.sensor_health().consecutive_errors, 6);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::IntegrityLost { .. })), 1);

    rig.reading(32.0);
    let health = rig.app.sensor_health();
    assert!(health.integrity_ok);
    assert_eq!(health.consecutive_errors, 0);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::IntegrityRestored)), 1);
}

// ── Outputs ───────────────────────────────────────────────────

#[test]
fn normal_shows_green_only() {
    let mut rig = Rig::new();
    rig.reading(25.0);
    assert!(rig.hw.output(Output::GreenLed));
    for o in [Output::YellowLed, Output::RedLed, Output::Buzzer, Output::Relay] {
        assert!(!rig.hw.output(o), "{o:?}");
    }
}

#[test]
fn danger_drives_red_and_buzzer() {
    let mut rig = Rig::new();
    rig.reading(70.0);
    assert!(!rig.hw.output(Output::GreenLed));
    assert!(rig.hw.output(Output::RedLed));
    assert!(rig.hw.output(Output::Buzzer));
    assert!(!rig.hw.output(Output::Relay), "one reading is below the warm-up floor");

    // Red blinks at 200 ms; buzzer stays on.
    rig.tick_at(200);
    assert!(!rig.hw.output(Output::RedLed));
    assert!(rig.hw.output(Output::Buzzer));
}

#[test]
fn only_changed_outputs_are_written() {
    let mut rig = Rig::new();
    rig.reading(25.0);
    assert_eq!(rig.hw.calls.len(), 5, "first frame writes every output");

    rig.reading(25.0);
    assert_eq!(rig.hw.calls.len(), 5);

    rig.reading(55.0);
    let new: Vec<_> = rig.hw.calls[5..].to_vec();
    assert_eq!(
        new,
        [
            (Output::GreenLed, false),
            (Output::YellowLed, true),
            (Output::Buzzer, true),
        ]
    );
}

// ── Reports ───────────────────────────────────────────────────

#[test]
fn status_reply_is_json() {
    let mut rig = Rig::new();
    rig.reading(55.0);
    let reply = rig.command("status");
    assert_eq!(reply.len(), 1);

    let v: serde_json::Value = serde_json::from_str(&reply[0]).unwrap();
    assert_eq!(v["kind"], "Status");
    assert_eq!(v["level"], "Warning");
    assert_eq!(v["mode"], "Auto");
    assert_eq!(v["stats"]["total_readings"], 1);
    assert_eq!(v["integrity_ok"], true);
}

#[test]
fn stats_and_security_report_kinds() {
    let mut rig = Rig::new();
    rig.reading(25.0);
    for (cmd, kind) in [("STATS", "Stats"), ("SECURITY", "Security")] {
        let reply = rig.command(cmd);
        let v: serde_json::Value = serde_json::from_str(&reply[0]).unwrap();
        assert_eq!(v["kind"], kind);
    }
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Report(_))), 2);
}

#[test]
fn telemetry_every_thirty_seconds() {
    let mut rig = Rig::new();
    rig.reading(25.0);
    rig.tick_at(29_999);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);
    rig.tick_at(30_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 1);
    rig.tick_at(45_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 1);
    rig.tick_at(60_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 2);
}

// ── Demo mode ─────────────────────────────────────────────────

#[test]
fn demo_injection_bypasses_sensor() {
    let mut rig = Rig::new();
    rig.readings(&[25.0, 25.0]);
    let reply = rig.command("TEST_WARNING");
    assert_eq!(reply, ["OK TEST_WARNING: demo 55.0C"]);
    assert_eq!(rig.app.mode(), OperatingMode::Demo);

    // The injected value is used as-is and never touches the hardware.
    rig.refresh();
    assert_eq!(rig.app.level(), RiskLevel::Warning);
    assert_eq!(rig.app.temperature_c(), 55.0);
    assert_eq!(rig.app.stats().sensor_errors, 0);
    assert_eq!(rig.app.last_reading().unwrap().source, ReadingSource::Injected);

    rig.command("AUTO");
    rig.reading(30.0);
    assert_eq!(rig.app.level(), RiskLevel::Normal);
}

#[test]
fn demo_motion_triggers_presence_alert() {
    let mut rig = Rig::new();
    rig.readings(&[25.0, 25.0]);
    rig.command("TEST_WARNING");
    assert_eq!(rig.command("MOTION"), ["OK MOTION: on"]);
    assert!(rig.app.demo_motion());

    rig.refresh();
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PresenceAlert { .. })), 1);

    assert_eq!(rig.command("motion"), ["OK MOTION: off"]);
}
