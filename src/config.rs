//! System configuration parameters
//!
//! All tunable parameters for the Firewatch monitor.
//! The host binary can override any subset of them from a JSON file;
//! missing fields fall back to [`MonitorConfig::default()`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hard capacity of the normalised command buffer.  `max_command_len`
/// may be configured lower, never higher.
pub const COMMAND_CAPACITY: usize = 20;

/// Core monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Risk thresholds ---
    /// Temperature (°C) at or above which risk is Warning
    pub warning_threshold_c: f32,
    /// Temperature (°C) at or above which risk is Danger
    pub danger_threshold_c: f32,

    // --- Sensor validation ---
    /// Lowest plausible reading (°C); anything below is rejected
    pub min_valid_c: f32,
    /// Highest plausible reading (°C); anything above is rejected
    pub max_valid_c: f32,
    /// Consecutive rejected readings before integrity is lost
    pub sensor_error_ceiling: u32,
    /// Last-known-good value used before the first valid reading
    pub initial_temperature_c: f32,

    // --- Suppression ---
    /// Completed readings required before suppression may fire
    pub suppression_min_readings: u32,
    /// Relay hold time after the confirmation flashes (milliseconds)
    pub suppression_dwell_ms: u32,
    /// Duration of each on/off phase of the confirmation flash
    pub suppression_flash_phase_ms: u32,
    /// Number of on/off confirmation cycles
    pub suppression_flash_cycles: u8,

    // --- Commands ---
    /// Longest accepted command after trimming
    pub max_command_len: usize,
    /// Invalid commands tolerated before a security alert
    pub invalid_alert_threshold: u32,
    /// Completed readings required before TEST_* commands are honoured
    pub demo_min_readings: u32,
    /// Upper bound on commands handled per tick
    pub max_commands_per_tick: u8,

    // --- Demo injection ---
    /// Injected temperatures for TEST_NORMAL / TEST_WARNING / TEST_DANGER
    pub demo_normal_c: f32,
    pub demo_warning_c: f32,
    pub demo_danger_c: f32,

    // --- Indicator timing ---
    /// Yellow LED toggle period in Warning (milliseconds)
    pub warning_blink_ms: u32,
    /// Buzzer toggle period in Warning (milliseconds)
    pub warning_buzzer_ms: u32,
    /// Red LED toggle period in Danger (milliseconds)
    pub danger_blink_ms: u32,

    // --- Timing ---
    /// Sensor refresh interval (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Main loop tick period used by the host binary (milliseconds)
    pub loop_interval_ms: u32,
    /// Telemetry report interval (milliseconds)
    pub telemetry_interval_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Risk
            warning_threshold_c: 50.0,
            danger_threshold_c: 60.0,

            // Sensor validation
            min_valid_c: -10.0,
            max_valid_c: 85.0,
            sensor_error_ceiling: 5,
            initial_temperature_c: 25.0,

            // Suppression
            suppression_min_readings: 3,
            suppression_dwell_ms: 2500,
            suppression_flash_phase_ms: 100,
            suppression_flash_cycles: 3,

            // Commands
            max_command_len: COMMAND_CAPACITY,
            invalid_alert_threshold: 3,
            demo_min_readings: 2,
            max_commands_per_tick: 4,

            // Demo injection
            demo_normal_c: 25.0,
            demo_warning_c: 55.0,
            demo_danger_c: 70.0,

            // Indicators
            warning_blink_ms: 1000,
            warning_buzzer_ms: 2000,
            danger_blink_ms: 200,

            // Timing
            sensor_read_interval_ms: 1000, // 1 Hz
            loop_interval_ms: 20,          // 50 Hz
            telemetry_interval_ms: 30_000,
        }
    }
}

impl MonitorConfig {
    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would make the risk or sensor logic
    /// meaningless.  Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        let temps = [
            self.warning_threshold_c,
            self.danger_threshold_c,
            self.min_valid_c,
            self.max_valid_c,
            self.initial_temperature_c,
        ];
        if temps.iter().any(|t| !t.is_finite()) {
            return Err(Error::Config("temperatures must be finite"));
        }
        if self.min_valid_c >= self.max_valid_c {
            return Err(Error::Config("min_valid_c must be below max_valid_c"));
        }
        if self.warning_threshold_c >= self.danger_threshold_c {
            return Err(Error::Config(
                "warning_threshold_c must be below danger_threshold_c",
            ));
        }
        if self.danger_threshold_c > self.max_valid_c {
            return Err(Error::Config("danger_threshold_c must be a valid reading"));
        }
        if !(self.min_valid_c..=self.max_valid_c).contains(&self.initial_temperature_c) {
            return Err(Error::Config("initial_temperature_c out of valid range"));
        }
        if self.sensor_error_ceiling == 0 || self.invalid_alert_threshold == 0 {
            return Err(Error::Config("error thresholds must be non-zero"));
        }
        if self.max_command_len == 0 || self.max_command_len > COMMAND_CAPACITY {
            return Err(Error::Config("max_command_len must be 1..=20"));
        }
        if self.max_commands_per_tick == 0 {
            return Err(Error::Config("max_commands_per_tick must be non-zero"));
        }
        let periods = [
            self.suppression_flash_phase_ms,
            self.warning_blink_ms,
            self.warning_buzzer_ms,
            self.danger_blink_ms,
            self.sensor_read_interval_ms,
            self.loop_interval_ms,
            self.telemetry_interval_ms,
        ];
        if periods.contains(&0) {
            return Err(Error::Config("periods must be non-zero"));
        }
        Ok(())
    }
}
