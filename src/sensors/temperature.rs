//! Temperature reading model and analog probe conversion.
//!
//! The probe is an LM35-class linear sensor (10 mV/°C, 0 V at 0 °C) read
//! through an ADC.  Conversion lives here so that hardware adapters only
//! deal in raw counts; the gateway deals only in degrees.

/// Where the effective value of a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ReadingSource {
    /// Accepted straight from the sensor.
    Sensor,
    /// Sensor value rejected; last-known-good substituted.
    Substituted,
    /// Operator-injected demo value.
    Injected,
}

/// One refresh of the temperature channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    /// Value as acquired, `None` when the acquisition itself failed.
    pub raw_c: Option<f32>,
    /// Value the rest of the system acts on.
    pub celsius: f32,
    /// `false` when the raw value was rejected.
    pub valid: bool,
    pub source: ReadingSource,
    /// Monotonic time of the refresh.
    pub timestamp_ms: u64,
}

impl TemperatureReading {
    pub fn accepted(celsius: f32, timestamp_ms: u64) -> Self {
        Self {
            raw_c: Some(celsius),
            celsius,
            valid: true,
            source: ReadingSource::Sensor,
            timestamp_ms,
        }
    }

    pub fn substituted(raw_c: Option<f32>, last_good_c: f32, timestamp_ms: u64) -> Self {
        Self {
            raw_c,
            celsius: last_good_c,
            valid: false,
            source: ReadingSource::Substituted,
            timestamp_ms,
        }
    }

    pub fn injected(celsius: f32, timestamp_ms: u64) -> Self {
        Self {
            raw_c: Some(celsius),
            celsius,
            valid: true,
            source: ReadingSource::Injected,
            timestamp_ms,
        }
    }
}

/// 10-bit ADC full scale.
pub const ADC_MAX: u16 = 1023;
/// ADC reference voltage in millivolts.
pub const V_REF_MV: f32 = 5000.0;
const MV_PER_DEGREE: f32 = 10.0;

/// Convert a raw ADC sample to °C.
///
/// Counts above `adc_max` are passed through unclamped so the gateway's
/// range check sees them as implausible rather than as full-scale heat.
pub fn adc_to_celsius(raw: u16, adc_max: u16, v_ref_mv: f32) -> f32 {
    let millivolts = f32::from(raw) * v_ref_mv / f32::from(adc_max.max(1));
    millivolts / MV_PER_DEGREE
}
