//! Operator commands.
//!
//! Parsing is split in two stages so that nothing unvalidated ever reaches
//! the dispatcher:
//!
//! 1. [`normalize`]: trim, reject empty, reject over-long input without
//!    looking at its content, upper-case into a bounded buffer.
//! 2. [`parse`]: exact match against the closed [`KEYWORDS`] catalogue.
//!
//! The vocabulary is case-insensitive; `test_danger`, `TEST_DANGER` and
//! `  Test_Danger ` are the same command.

use crate::config::COMMAND_CAPACITY;
use crate::error::CommandError;

/// Injected scenario for the TEST_* commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Normal,
    Warning,
    Danger,
}

/// Commands the operator can issue over the command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List the command catalogue.
    Help,
    /// Full status snapshot.
    Status,
    /// Lifetime counters.
    Stats,
    /// Sensor integrity and command-security state.
    Security,
    /// Switch to Demo mode and inject a scenario temperature.
    Test(Scenario),
    /// Toggle the injected motion flag.
    Motion,
    /// Back to Normal / Auto with clean counters and default outputs.
    Reset,
    /// Live sensor values.
    Auto,
    /// Injected values.
    Demo,
}

impl Command {
    /// Canonical upper-case keyword.
    pub fn keyword(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, cmd, _)| *cmd == self)
            .map_or("?", |(kw, _, _)| kw)
    }

    /// TEST_* commands only run once the sensor pipeline is warmed up
    /// and trustworthy.
    pub fn requires_warm_sensor(self) -> bool {
        matches!(self, Self::Test(_))
    }
}

/// Keyword, command and one-line description, in help order.
pub const KEYWORDS: [(&str, Command, &str); 11] = [
    ("HELP", Command::Help, "list commands"),
    ("STATUS", Command::Status, "current risk, mode and sensor state"),
    ("STATS", Command::Stats, "lifetime counters"),
    ("SECURITY", Command::Security, "sensor integrity and command security"),
    ("TEST_NORMAL", Command::Test(Scenario::Normal), "demo: inject normal temperature"),
    ("TEST_WARNING", Command::Test(Scenario::Warning), "demo: inject warning temperature"),
    ("TEST_DANGER", Command::Test(Scenario::Danger), "demo: inject danger temperature"),
    ("MOTION", Command::Motion, "demo: toggle motion"),
    ("RESET", Command::Reset, "return to normal/auto, clear counters"),
    ("AUTO", Command::Auto, "use live sensors"),
    ("DEMO", Command::Demo, "use injected values"),
];

/// Normalised command text.
pub type CommandBuf = heapless::String<COMMAND_CAPACITY>;

/// Stage 1: validate shape, produce the canonical upper-case form.
///
/// `max_len` is clamped to [`COMMAND_CAPACITY`].  Length is measured in
/// characters after trimming.
pub fn normalize(raw: &str, max_len: usize) -> Result<CommandBuf, CommandError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Empty);
    }
    if trimmed.chars().count() > max_len.min(COMMAND_CAPACITY) {
        return Err(CommandError::TooLong);
    }

    let mut buf = CommandBuf::new();
    for c in trimmed.chars() {
        buf.push(c.to_ascii_uppercase())
            .map_err(|_| CommandError::TooLong)?;
    }
    Ok(buf)
}

/// Stage 2: map normalised text onto the closed command set.
pub fn parse(normalized: &str) -> Result<Command, CommandError> {
    KEYWORDS
        .iter()
        .find(|(kw, _, _)| *kw == normalized)
        .map(|(_, cmd, _)| *cmd)
        .ok_or(CommandError::Unknown)
}
