//! Sensor gateway: validated temperature and motion acquisition.
//!
//! The gateway sits between the raw [`SensorPort`] and the risk logic.  It
//! owns the operating mode (live hardware vs. injected demo values), the
//! last-known-good temperature and the sensor health counters.
//!
//! ## Validation policy
//!
//! 1. A raw value is accepted iff it is finite and inside
//!    `[min_valid_c, max_valid_c]`.
//! 2. A rejected (or failed) read bumps the consecutive-error count and the
//!    last-known-good value is substituted.  Substitution never resets the
//!    count.
//! 3. When the count reaches the ceiling, integrity is lost.  The count is
//!    not capped; it keeps climbing until the next valid reading.
//! 4. Any valid reading resets the count and restores integrity.
//!
//! Demo values are pre-trusted: they bypass validation and leave the
//! health counters untouched.

pub mod temperature;

use log::{info, warn};

use crate::app::ports::SensorPort;
use crate::config::MonitorConfig;
use crate::error::SensorError;
use temperature::TemperatureReading;

/// Live hardware or operator-injected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum OperatingMode {
    Auto,
    Demo,
}

/// Health of the temperature channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorHealth {
    /// Rejected readings since the last valid one.
    pub consecutive_errors: u32,
    /// `false` once `consecutive_errors` has reached the ceiling.
    pub integrity_ok: bool,
}

impl Default for SensorHealth {
    fn default() -> Self {
        Self {
            consecutive_errors: 0,
            integrity_ok: true,
        }
    }
}

/// What the gateway concluded about one temperature refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Valid sensor value.  `integrity_restored` is set on the first valid
    /// reading after integrity had been lost.
    Accepted { integrity_restored: bool },
    /// Demo value, not validated.
    Injected,
    /// Sensor value rejected and last-known-good substituted.
    /// `integrity_lost` is set only on the refresh that reached the ceiling.
    Rejected {
        error: SensorError,
        consecutive_errors: u32,
        integrity_lost: bool,
    },
}

/// Result of one gateway refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub reading: TemperatureReading,
    pub motion: bool,
    pub verdict: Verdict,
}

pub struct SensorGateway {
    mode: OperatingMode,
    demo_temperature_c: f32,
    demo_motion: bool,
    last_good_c: f32,
    health: SensorHealth,
    min_valid_c: f32,
    max_valid_c: f32,
    error_ceiling: u32,
    default_demo_c: f32,
    initial_c: f32,
}

impl SensorGateway {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            mode: OperatingMode::Auto,
            demo_temperature_c: config.demo_normal_c,
            demo_motion: false,
            last_good_c: config.initial_temperature_c,
            health: SensorHealth::default(),
            min_valid_c: config.min_valid_c,
            max_valid_c: config.max_valid_c,
            error_ceiling: config.sensor_error_ceiling,
            default_demo_c: config.demo_normal_c,
            initial_c: config.initial_temperature_c,
        }
    }

    /// Refresh temperature and motion in one go.
    pub fn refresh(&mut self, port: &mut impl SensorPort, now_ms: u64) -> SensorSample {
        let (reading, verdict) = self.read(port, now_ms);
        let motion = self.motion(port);
        SensorSample {
            reading,
            motion,
            verdict,
        }
    }

    /// Acquire and validate one temperature reading.
    pub fn read(
        &mut self,
        port: &mut impl SensorPort,
        now_ms: u64,
    ) -> (TemperatureReading, Verdict) {
        if self.mode == OperatingMode::Demo {
            return (
                TemperatureReading::injected(self.demo_temperature_c, now_ms),
                Verdict::Injected,
            );
        }

        let raw = port.read_temperature();
        match raw.and_then(|t| self.validate(t)) {
            Ok(celsius) => {
                let integrity_restored = !self.health.integrity_ok;
                if integrity_restored {
                    info!(
                        "SENSOR: valid reading {:.1}\u{00b0}C after {} errors, integrity restored",
                        celsius, self.health.consecutive_errors
                    );
                }
                self.health = SensorHealth::default();
                self.last_good_c = celsius;
                (
                    TemperatureReading::accepted(celsius, now_ms),
                    Verdict::Accepted { integrity_restored },
                )
            }
            Err(error) => {
                self.health.consecutive_errors = self.health.consecutive_errors.saturating_add(1);
                let integrity_lost = self.health.consecutive_errors == self.error_ceiling;
                if integrity_lost {
                    self.health.integrity_ok = false;
                }
                warn!(
                    "SENSOR: rejected ({error}, raw={:?}), using last good {:.1}\u{00b0}C, errors={}",
                    raw.ok(),
                    self.last_good_c,
                    self.health.consecutive_errors
                );
                (
                    TemperatureReading::substituted(raw.ok(), self.last_good_c, now_ms),
                    Verdict::Rejected {
                        error,
                        consecutive_errors: self.health.consecutive_errors,
                        integrity_lost,
                    },
                )
            }
        }
    }

    /// Motion input; in Demo mode the injected flag.
    pub fn motion(&mut self, port: &mut impl SensorPort) -> bool {
        match self.mode {
            OperatingMode::Auto => port.read_motion(),
            OperatingMode::Demo => self.demo_motion,
        }
    }

    // ── Demo injection / mode ─────────────────────────────────

    pub fn set_mode(&mut self, mode: OperatingMode) {
        if self.mode != mode {
            info!("SENSOR: mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Switch to Demo mode and inject `celsius` as the reading.
    pub fn inject_temperature(&mut self, celsius: f32) {
        self.set_mode(OperatingMode::Demo);
        self.demo_temperature_c = celsius;
    }

    /// Flip the injected motion flag; returns the new value.
    pub fn toggle_demo_motion(&mut self) -> bool {
        self.demo_motion = !self.demo_motion;
        self.demo_motion
    }

    /// Back to Auto with default demo values and a clean health record.
    pub fn reset(&mut self) {
        self.mode = OperatingMode::Auto;
        self.demo_temperature_c = self.default_demo_c;
        self.demo_motion = false;
        self.health = SensorHealth::default();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn health(&self) -> SensorHealth {
        self.health
    }

    pub fn last_good_c(&self) -> f32 {
        self.last_good_c
    }

    pub fn demo_temperature_c(&self) -> f32 {
        self.demo_temperature_c
    }

    pub fn demo_motion(&self) -> bool {
        self.demo_motion
    }

    /// Value substituted before the first valid reading.
    pub fn initial_c(&self) -> f32 {
        self.initial_c
    }

    // ── Internal ──────────────────────────────────────────────

    fn validate(&self, celsius: f32) -> Result<f32, SensorError> {
        if !celsius.is_finite() {
            return Err(SensorError::NotFinite);
        }
        if celsius < self.min_valid_c || celsius > self.max_valid_c {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }
}
