//! Command-channel tests: validation, preconditions, the invalid-attempt
//! alert cycle and RESET.

use crate::mock_hw::Rig;

use firewatch::app::commands::{Command, KEYWORDS, Scenario};
use firewatch::app::events::AppEvent;
use firewatch::app::ports::Output;
use firewatch::config::MonitorConfig;
use firewatch::error::CommandError;
use firewatch::fsm::RiskLevel;
use firewatch::sensors::OperatingMode;

// ── Validation ────────────────────────────────────────────────

#[test]
fn over_long_command_is_rejected_and_counted() {
    let mut rig = Rig::new();
    let reply = rig.command(&"S".repeat(25));
    assert_eq!(reply, ["ERR command too long (1/3)"]);
    assert_eq!(rig.app.invalid_command_count(), 1);
    assert_eq!(rig.app.stats().invalid_commands, 1);
}

#[test]
fn line_overflowing_the_channel_is_rejected() {
    let mut rig = Rig::new();
    let line = format!("STATUS{}GARBAGE", " ".repeat(58));
    let reply = rig.command(&line);
    assert_eq!(reply, ["ERR command too long (1/3)"]);
    assert_eq!(rig.app.invalid_command_count(), 1);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Report(_))), 0);
}

#[test]
fn commands_are_case_insensitive_and_trimmed() {
    let mut rig = Rig::new();
    assert_eq!(rig.command("  auto \r"), ["OK AUTO"]);
    assert_eq!(rig.command("Demo"), ["OK DEMO"]);
    assert_eq!(rig.app.mode(), OperatingMode::Demo);
    assert_eq!(rig.app.invalid_command_count(), 0);
}

#[test]
fn help_lists_every_command() {
    let mut rig = Rig::new();
    let reply = rig.command("help");
    assert_eq!(reply[0], "COMMANDS:");
    assert_eq!(reply.len(), KEYWORDS.len() + 1);
    for (kw, _, _) in KEYWORDS {
        assert!(reply.iter().any(|l| l.contains(kw)), "{kw} missing");
    }
}

// ── Invalid-attempt policy ────────────────────────────────────

#[test]
fn third_invalid_command_raises_security_alert() {
    let mut rig = Rig::new();
    rig.command("");
    rig.command("launch");
    let reply = rig.command("self_destruct");

    assert_eq!(
        reply,
        ["ERR unknown command", "ALERT security: 3 invalid commands"]
    );
    assert_eq!(rig.app.invalid_command_count(), 0, "count resets after the alert");
    assert_eq!(rig.app.stats().invalid_commands, 3);
    assert_eq!(rig.app.stats().security_alerts, 1);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SecurityAlert { attempts: 3 })),
        1
    );

    // Next cycle starts from zero.
    rig.command("nope");
    assert_eq!(rig.app.invalid_command_count(), 1);
}

#[test]
fn rejections_report_their_reason() {
    let mut rig = Rig::new();
    rig.command("   ");
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CommandRejected {
            error: CommandError::Empty,
            invalid_count: 1
        }
    )));
}

#[test]
fn alert_threshold_is_configurable() {
    let config = MonitorConfig {
        invalid_alert_threshold: 1,
        ..MonitorConfig::default()
    };
    let mut rig = Rig::with_config(config);
    let reply = rig.command("x");
    assert_eq!(reply.len(), 2);
    assert_eq!(rig.app.stats().security_alerts, 1);
}

// ── Preconditions ─────────────────────────────────────────────

#[test]
fn test_danger_before_warm_up_is_denied() {
    let mut rig = Rig::new();
    let reply = rig.command("test_danger");
    assert_eq!(reply, ["DENIED TEST_DANGER: sensor warm-up incomplete"]);
    assert_eq!(rig.app.mode(), OperatingMode::Auto);
    assert_eq!(rig.app.invalid_command_count(), 0);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::PreconditionNotMet {
            command: Command::Test(Scenario::Danger),
            ..
        }
    )));
}

#[test]
fn test_danger_after_warm_up_injects_seventy() {
    let mut rig = Rig::new();
    rig.readings(&[25.0, 25.0, 25.0]);
    assert_eq!(rig.command("TEST_DANGER"), ["OK TEST_DANGER: demo 70.0C"]);
    assert_eq!(rig.app.demo_temperature_c(), 70.0);
    assert_eq!(rig.app.mode(), OperatingMode::Demo);
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged(OperatingMode::Demo)));

    rig.refresh();
    assert_eq!(rig.app.level(), RiskLevel::Danger);
}

#[test]
fn test_commands_denied_while_integrity_lost() {
    let mut rig = Rig::new();
    rig.reading(25.0);
    for _ in 0..5 {
        rig.failed_reading();
    }
    assert!(!rig.app.sensor_health().integrity_ok);

    assert_eq!(
        rig.command("TEST_NORMAL"),
        ["DENIED TEST_NORMAL: sensor integrity lost"]
    );
    // Other commands still work.
    assert_eq!(rig.command("DEMO"), ["OK DEMO"]);
}

// ── RESET ─────────────────────────────────────────────────────

#[test]
fn reset_restores_defaults_but_keeps_statistics() {
    let mut rig = Rig::new();
    rig.readings(&[25.0, 25.0, 25.0]);
    rig.failed_reading();
    rig.command("TEST_DANGER");
    rig.command("MOTION");
    rig.refresh();
    rig.command("bogus");
    assert_eq!(rig.app.level(), RiskLevel::Danger);
    assert!(rig.app.suppression_active());
    assert!(rig.hw.output(Output::Relay));
    assert_eq!(rig.app.sensor_health().consecutive_errors, 1);

    assert_eq!(rig.command("reset"), ["OK RESET"]);

    assert_eq!(rig.app.level(), RiskLevel::Normal);
    assert_eq!(rig.app.mode(), OperatingMode::Auto);
    assert!(!rig.app.suppression_latched());
    assert!(!rig.app.suppression_active());
    assert_eq!(rig.app.sensor_health().consecutive_errors, 0);
    assert!(rig.app.sensor_health().integrity_ok);
    assert_eq!(rig.app.invalid_command_count(), 0);
    assert_eq!(rig.app.demo_temperature_c(), 25.0);
    assert!(!rig.app.demo_motion());

    // Default outputs written immediately.
    assert!(rig.hw.output(Output::GreenLed));
    assert!(!rig.hw.output(Output::RedLed));
    assert!(!rig.hw.output(Output::Buzzer));
    assert!(!rig.hw.output(Output::Relay));

    // Lifetime counters survive.
    let stats = rig.app.stats();
    assert_eq!(stats.danger_entries, 1);
    assert_eq!(stats.suppression_activations, 1);
    assert_eq!(stats.invalid_commands, 1);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SystemReset)), 1);
}

// ── Throughput ────────────────────────────────────────────────

#[test]
fn commands_per_tick_are_bounded() {
    let mut rig = Rig::new();
    for _ in 0..6 {
        rig.channel.inbox.push_back("AUTO".to_owned());
    }
    rig.refresh();
    assert_eq!(rig.channel.sent.len(), 4);
    rig.tick_at(rig.now_ms + 1);
    assert_eq!(rig.channel.sent.len(), 6);
}
