//! Command gateway: validation, preconditions and invalid-attempt policy.
//!
//! Every raw operator line goes through [`CommandGateway::submit`]:
//!
//! ```text
//!  raw ──▶ normalize ──▶ parse ──▶ preconditions ──▶ Accepted(cmd)
//!             │            │             │
//!             └────────────┴──▶ invalid  └──▶ PreconditionNotMet
//!                               count++        (count untouched)
//!                                  │
//!  truncated CommandLine ──────────┤
//!                                  │
//!                    count == threshold ──▶ SecurityAlert, count = 0
//! ```
//!
//! The gateway decides; it never executes.  The service applies accepted
//! commands and turns every outcome into responses and events.

use log::{info, warn};

use super::commands::{self, Command};
use super::ports::CommandLine;
use crate::config::MonitorConfig;
use crate::error::{CommandError, Precondition};

/// Monitor state the preconditions depend on.
#[derive(Debug, Clone, Copy)]
pub struct CommandGate {
    pub total_readings: u32,
    pub integrity_ok: bool,
}

/// What happened to one submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted(Command),
    /// Valid command, refused for now.  Not counted as invalid.
    PreconditionNotMet {
        command: Command,
        error: CommandError,
    },
    /// Invalid input, counted.
    Rejected {
        error: CommandError,
        invalid_count: u32,
    },
    /// Invalid input that reached the alert threshold.  The count has
    /// already been reset.
    SecurityAlert {
        error: CommandError,
        attempts: u32,
    },
}

pub struct CommandGateway {
    invalid_count: u32,
    alert_threshold: u32,
    max_len: usize,
    demo_min_readings: u32,
}

impl CommandGateway {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            invalid_count: 0,
            alert_threshold: config.invalid_alert_threshold,
            max_len: config.max_command_len,
            demo_min_readings: config.demo_min_readings,
        }
    }

    /// Judge one line as received from a [`CommandChannel`](super::ports::CommandChannel).
    /// A line the channel had to cut short is too long, whatever it starts with.
    pub fn submit_line(&mut self, line: &CommandLine, gate: &CommandGate) -> CommandOutcome {
        if line.is_truncated() {
            return self.refuse(None, CommandError::TooLong);
        }
        self.submit(line.as_str(), gate)
    }

    pub fn submit(&mut self, raw: &str, gate: &CommandGate) -> CommandOutcome {
        let parsed = commands::normalize(raw, self.max_len)
            .and_then(|buf| commands::parse(buf.as_str()));

        let command = match parsed {
            Ok(command) => command,
            Err(error) => return self.refuse(None, error),
        };

        match self.check_preconditions(command, gate) {
            Ok(()) => CommandOutcome::Accepted(command),
            Err(error) => self.refuse(Some(command), error),
        }
    }

    /// Invalid commands since the last alert.
    pub fn invalid_count(&self) -> u32 {
        self.invalid_count
    }

    pub fn reset(&mut self) {
        self.invalid_count = 0;
    }

    fn check_preconditions(&self, command: Command, gate: &CommandGate) -> Result<(), CommandError> {
        if !command.requires_warm_sensor() {
            return Ok(());
        }
        if gate.total_readings < self.demo_min_readings {
            return Err(CommandError::PreconditionNotMet(Precondition::SensorWarmUp));
        }
        if !gate.integrity_ok {
            return Err(CommandError::PreconditionNotMet(Precondition::SensorIntegrity));
        }
        Ok(())
    }

    /// Only invalid input counts towards the alert; a recognised command
    /// that is merely early is reported back untouched.
    fn refuse(&mut self, command: Option<Command>, error: CommandError) -> CommandOutcome {
        match command {
            Some(command) if !error.is_invalid_input() => {
                info!("COMMAND: {} denied ({error})", command.keyword());
                CommandOutcome::PreconditionNotMet { command, error }
            }
            _ => self.record_invalid(error),
        }
    }

    fn record_invalid(&mut self, error: CommandError) -> CommandOutcome {
        self.invalid_count = self.invalid_count.saturating_add(1);
        warn!(
            "COMMAND: rejected ({error}), invalid attempts {}/{}",
            self.invalid_count, self.alert_threshold
        );

        if self.invalid_count >= self.alert_threshold {
            let attempts = self.invalid_count;
            self.invalid_count = 0;
            warn!("SECURITY: {attempts} invalid commands, alert raised");
            return CommandOutcome::SecurityAlert { error, attempts };
        }

        CommandOutcome::Rejected {
            error,
            invalid_count: self.invalid_count,
        }
    }
}
