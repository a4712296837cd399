//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the latest validated sensor snapshot, the risk thresholds and
//! the lifetime statistics that state entries update.

use crate::config::MonitorConfig;
use crate::diagnostics::Statistics;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// The validated inputs of the latest sensor refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Effective temperature (°C) after validation/substitution.
    pub temperature_c: f32,
    /// Motion detected on this refresh.
    pub motion: bool,
    /// Sensor integrity flag at the time of the refresh.
    pub integrity_ok: bool,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub warning_c: f32,
    pub danger_c: f32,
}

impl From<&MonitorConfig> for RiskThresholds {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            warning_c: config.warning_threshold_c,
            danger_c: config.danger_threshold_c,
        }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Evaluations since the current level was entered.
    pub evaluations_in_level: u64,

    // -- Inputs --
    pub sensors: SensorSnapshot,
    pub thresholds: RiskThresholds,

    // -- Outputs --
    /// Lifetime counters; Warning/Danger entries are recorded by `on_enter`.
    pub stats: Statistics,
}

impl FsmContext {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            evaluations_in_level: 0,
            sensors: SensorSnapshot {
                temperature_c: config.initial_temperature_c,
                motion: false,
                integrity_ok: true,
            },
            thresholds: RiskThresholds::from(config),
            stats: Statistics::default(),
        }
    }
}
