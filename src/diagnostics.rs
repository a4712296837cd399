//! Statistics and status reports.
//!
//! [`Statistics`] accumulates lifetime counters; they only ever grow and
//! are not touched by the RESET command.  A [`StatusReport`] is an
//! on-demand snapshot of the whole monitor, serialised to JSON for the
//! command channel and logged periodically as telemetry.

use serde::Serialize;

use crate::fsm::RiskLevel;
use crate::sensors::OperatingMode;

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Completed temperature refreshes (valid, substituted or injected).
    pub total_readings: u32,
    /// Transitions into Warning.
    pub warning_entries: u32,
    /// Transitions into Danger.
    pub danger_entries: u32,
    /// Suppression relay activations.
    pub suppression_activations: u32,
    /// Rejected sensor readings.
    pub sensor_errors: u32,
    /// Invalid operator commands.
    pub invalid_commands: u32,
    /// Security alerts raised (integrity loss or repeated invalid commands).
    pub security_alerts: u32,
}

impl Statistics {
    pub fn record_reading(&mut self) {
        self.total_readings = self.total_readings.saturating_add(1);
    }

    pub fn record_sensor_error(&mut self) {
        self.sensor_errors = self.sensor_errors.saturating_add(1);
    }

    pub fn record_invalid_command(&mut self) {
        self.invalid_commands = self.invalid_commands.saturating_add(1);
    }

    pub fn record_security_alert(&mut self) {
        self.security_alerts = self.security_alerts.saturating_add(1);
    }
}

/// Which view the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    Status,
    Stats,
    Security,
    /// Periodic, not operator-requested.
    Telemetry,
}

/// Point-in-time snapshot of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub kind: ReportKind,
    pub uptime_ms: u64,
    pub level: RiskLevel,
    pub mode: OperatingMode,
    pub temperature_c: f32,
    pub motion: bool,
    pub integrity_ok: bool,
    pub consecutive_errors: u32,
    /// Invalid commands since the last security alert.
    pub pending_invalid_commands: u32,
    pub suppression_latched: bool,
    pub suppression_active: bool,
    pub stats: Statistics,
}

impl StatusReport {
    /// Single-line JSON rendering for the command channel.
    pub fn to_json(&self) -> heapless::String<1024> {
        let mut out = heapless::String::new();
        match serde_json::to_string(self) {
            Ok(json) if out.push_str(&json).is_ok() => {}
            _ => {
                let _ = out.push_str("{\"error\":\"report unavailable\"}");
            }
        }
        out
    }
}
