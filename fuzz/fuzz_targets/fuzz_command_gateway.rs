//! Fuzz target: `CommandGateway::submit`
//!
//! Splits arbitrary bytes into lines and submits each one, checking that
//! the gateway never panics, never lets the pending invalid count reach
//! the alert threshold, and only accepts text that round-trips through
//! the keyword catalogue.
//!
//! cargo fuzz run fuzz_command_gateway

#![no_main]

use firewatch::app::commands::{self, KEYWORDS};
use firewatch::app::gateway::{CommandGate, CommandGateway, CommandOutcome};
use firewatch::config::MonitorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };

    let config = MonitorConfig::default();
    let mut gateway = CommandGateway::new(&config);
    let gate = CommandGate {
        total_readings: u32::from(flags & 0x7f),
        integrity_ok: flags & 0x80 == 0,
    };

    let text = String::from_utf8_lossy(rest);
    for line in text.split('\n') {
        match gateway.submit(line, &gate) {
            CommandOutcome::Accepted(cmd) => {
                let normalized = commands::normalize(line, config.max_command_len)
                    .expect("accepted input must normalise");
                assert_eq!(normalized.as_str(), cmd.keyword());
                assert!(KEYWORDS.iter().any(|(_, c, _)| *c == cmd));
            }
            CommandOutcome::PreconditionNotMet { command, error } => {
                assert!(command.requires_warm_sensor());
                assert!(!error.is_invalid_input());
            }
            CommandOutcome::Rejected { invalid_count, .. } => {
                assert!(invalid_count < config.invalid_alert_threshold);
            }
            CommandOutcome::SecurityAlert { attempts, .. } => {
                assert_eq!(attempts, config.invalid_alert_threshold);
            }
        }
        assert!(gateway.invalid_count() < config.invalid_alert_threshold);
    }
});
