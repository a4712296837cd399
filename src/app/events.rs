//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to the console, record them in a
//! test, forward them to a display.

use super::commands::Command;
use crate::diagnostics::StatusReport;
use crate::error::{CommandError, SensorError};
use crate::fsm::RiskLevel;
use crate::sensors::OperatingMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial level).
    Started(RiskLevel),

    // ── Risk ──────────────────────────────────────────────────
    RiskChanged {
        from: RiskLevel,
        to: RiskLevel,
        temperature_c: f32,
    },
    /// Motion seen while risk is Warning or Danger.
    PresenceAlert { level: RiskLevel },

    // ── Sensor health ─────────────────────────────────────────
    ReadingRejected {
        error: SensorError,
        raw_c: Option<f32>,
        substituted_c: f32,
        consecutive_errors: u32,
    },
    /// Consecutive rejections reached the ceiling.  Also a security alert.
    IntegrityLost { consecutive_errors: u32 },
    IntegrityRestored,

    // ── Suppression ───────────────────────────────────────────
    SuppressionActivated { activation: u32, temperature_c: f32 },
    /// Confirmation flashes done; relay holding for the dwell time.
    SuppressionHolding,
    SuppressionReleased,

    // ── Commands ──────────────────────────────────────────────
    CommandAccepted(Command),
    CommandRejected {
        error: CommandError,
        invalid_count: u32,
    },
    PreconditionNotMet {
        command: Command,
        error: CommandError,
    },
    /// Repeated invalid commands.
    SecurityAlert { attempts: u32 },
    ModeChanged(OperatingMode),
    SystemReset,

    // ── Reports ───────────────────────────────────────────────
    /// Operator-requested report.
    Report(StatusReport),
    /// Periodic snapshot.
    Telemetry(StatusReport),
}
