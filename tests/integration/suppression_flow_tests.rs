//! Suppression relay: one activation per Danger episode, the timed
//! confirmation sequence, and the gates that hold it back.

use crate::mock_hw::Rig;

use firewatch::app::events::AppEvent;
use firewatch::app::ports::Output;
use firewatch::config::MonitorConfig;
use firewatch::fsm::RiskLevel;

fn activations(rig: &Rig) -> u32 {
    rig.app.stats().suppression_activations
}

#[test]
fn one_activation_per_danger_episode() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0]);
    assert_eq!(activations(&rig), 0, "below the warm-up floor");

    rig.reading(70.0);
    assert_eq!(activations(&rig), 1);
    assert!(rig.app.suppression_latched());

    rig.reading(70.0);
    assert_eq!(activations(&rig), 1, "latched for the rest of the episode");

    rig.reading(25.0);
    assert_eq!(rig.app.level(), RiskLevel::Normal);
    assert!(!rig.app.suppression_latched());

    rig.reading(70.0);
    assert_eq!(activations(&rig), 2);
}

#[test]
fn new_episode_fires_while_relay_still_held() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0, 70.0, 25.0]);
    assert!(rig.app.suppression_active());

    // The second episode starts 2 s into the first sequence.
    rig.reading(70.0);
    assert_eq!(rig.app.stats().danger_entries, 2);
    assert_eq!(activations(&rig), 2);
    assert!(rig.app.suppression_latched());
    assert!(rig.hw.output(Output::Relay));

    // Cooling again before the relay would have released changes nothing.
    rig.readings(&[25.0, 25.0, 25.0]);
    assert_eq!(activations(&rig), 2);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SuppressionActivated { .. })),
        2
    );
}

#[test]
fn restarted_sequence_runs_its_full_length() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0, 70.0, 25.0, 70.0]); // second activation at t=4000

    // 600 ms of flashing from the restart, then 2500 ms of hold.
    rig.tick_at(4_600);
    rig.tick_at(7_099);
    assert!(rig.hw.output(Output::Relay));
    rig.tick_at(7_100);
    assert!(!rig.hw.output(Output::Relay));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SuppressionReleased)), 1);
}

#[test]
fn dropping_to_warning_does_not_rearm() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0, 70.0]);
    rig.reading(55.0);
    assert_eq!(rig.app.level(), RiskLevel::Warning);
    rig.reading(70.0);
    assert_eq!(activations(&rig), 1);
}

#[test]
fn relay_sequence_flash_hold_release() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0, 70.0]); // activation on the refresh at t=2000
    assert!(rig.hw.output(Output::Relay));
    assert!(rig.hw.output(Output::GreenLed), "first flash phase lights every LED");
    assert!(rig.hw.output(Output::YellowLed));
    assert!(rig.hw.output(Output::RedLed));
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SuppressionActivated { activation: 1, .. })),
        1
    );

    rig.tick_at(2_150);
    assert!(rig.hw.output(Output::Relay));
    assert!(!rig.hw.output(Output::GreenLed), "second flash phase");

    // 3 × 2 × 100 ms of flashing, then the relay holds for 2500 ms.
    rig.tick_at(2_600);
    assert!(rig.app.suppression_active());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SuppressionHolding)), 1);
    rig.tick_at(5_099);
    assert!(rig.hw.output(Output::Relay));

    rig.tick_at(5_100);
    assert!(!rig.app.suppression_active());
    assert!(!rig.hw.output(Output::Relay));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SuppressionReleased)), 1);
    assert!(rig.app.suppression_latched(), "release does not clear the latch");
}

#[test]
fn loop_keeps_running_during_sequence() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0, 70.0]);
    assert!(rig.app.suppression_active());

    let reply = rig.command("STATUS");
    let v: serde_json::Value = serde_json::from_str(&reply[0]).unwrap();
    assert_eq!(v["suppression_active"], true);
    assert_eq!(v["suppression_latched"], true);

    // Sensor refreshes continue while the relay is held.
    rig.reading(55.0);
    assert_eq!(rig.app.level(), RiskLevel::Warning);
    assert!(rig.app.suppression_active());
}

#[test]
fn lost_integrity_withholds_activation() {
    let config = MonitorConfig {
        sensor_error_ceiling: 1,
        ..MonitorConfig::default()
    };
    let mut rig = Rig::with_config(config);
    rig.reading(70.0);
    rig.failed_reading();
    rig.failed_reading();

    // Last-known-good keeps the monitor in Danger, but the data is not
    // trusted enough to fire the relay.
    assert_eq!(rig.app.level(), RiskLevel::Danger);
    assert_eq!(rig.app.stats().total_readings, 3);
    assert!(!rig.app.sensor_health().integrity_ok);
    assert_eq!(activations(&rig), 0);

    rig.reading(72.0);
    assert_eq!(activations(&rig), 1);
}

#[test]
fn reset_aborts_running_sequence() {
    let mut rig = Rig::new();
    rig.readings(&[70.0, 70.0, 70.0]);
    assert!(rig.hw.output(Output::Relay));

    rig.command("RESET");
    assert!(!rig.app.suppression_active());
    assert!(!rig.hw.output(Output::Relay));
    assert_eq!(rig.app.level(), RiskLevel::Normal);

    // The hardware still reads 70: the next refresh is a new episode.
    rig.refresh();
    assert_eq!(rig.app.level(), RiskLevel::Danger);
    assert_eq!(activations(&rig), 2);
}
