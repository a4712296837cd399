//! Unified error types for the Firewatch monitor.
//!
//! All types are `Copy` so they can be carried inside events and command
//! outcomes without allocation.
//!
//! None of these are fatal: sensor errors are recovered by substitution,
//! command errors by rejection.  Only configuration errors ([`Error`]) stop
//! the host binary, and only before the loop starts.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC/bus read returned an error.
    ReadFailed,
    /// Reading is outside the configured plausible range.
    OutOfRange,
    /// Conversion produced NaN or infinity.
    NotFinite,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NotFinite => write!(f, "reading not finite"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing left after trimming.
    Empty,
    /// Longer than the configured ceiling; never matched against keywords.
    TooLong,
    /// Not part of the command vocabulary.
    Unknown,
    /// Recognised, but issued before its preconditions hold.
    PreconditionNotMet(Precondition),
}

impl CommandError {
    /// Whether this error counts towards the invalid-command alert.
    pub const fn is_invalid_input(self) -> bool {
        !matches!(self, Self::PreconditionNotMet(_))
    }
}

/// Monitor state a command may wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Not enough sensor refreshes yet.
    SensorWarmUp,
    /// Consecutive sensor errors reached the ceiling.
    SensorIntegrity,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorWarmUp => write!(f, "sensor warm-up incomplete"),
            Self::SensorIntegrity => write!(f, "sensor integrity lost"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::TooLong => write!(f, "command too long"),
            Self::Unknown => write!(f, "unknown command"),
            Self::PreconditionNotMet(p) => write!(f, "{p}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
