//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the temperature ADC channel, the PIR input and the five digital
//! outputs, exposing them through [`SensorPort`] and [`ActuatorPort`].
//! Pins are anything implementing the `embedded-hal` 1.0 digital traits,
//! so the same adapter drives a board HAL or the [`sim`](super::sim)
//! stand-ins.
//!
//! Pin faults never reach the domain: a failed ADC read becomes
//! [`SensorError::ReadFailed`], a failed PIR read reads as "no motion",
//! and a failed output write is logged.

use core::fmt::Debug;

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::{error, warn};

use crate::app::ports::{ActuatorPort, Output, SensorPort};
use crate::error::SensorError;
use crate::sensors::temperature::{ADC_MAX, V_REF_MV, adc_to_celsius};

/// One analog input channel.  `embedded-hal` 1.0 has no ADC trait, so the
/// board layer implements this for its converter.
pub trait AdcChannel {
    type Error: Debug;

    /// Single conversion, raw counts.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// The five outputs, in [`Output`] order.
pub struct OutputPins<O> {
    pub green: O,
    pub yellow: O,
    pub red: O,
    pub buzzer: O,
    pub relay: O,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct PinHardware<A, M, O> {
    adc: A,
    adc_max: u16,
    v_ref_mv: f32,
    motion: M,
    outputs: OutputPins<O>,
}

impl<A, M, O> PinHardware<A, M, O>
where
    A: AdcChannel,
    M: InputPin,
    O: OutputPin,
{
    /// 10-bit ADC with a 5 V reference.
    pub fn new(adc: A, motion: M, outputs: OutputPins<O>) -> Self {
        Self::with_reference(adc, ADC_MAX, V_REF_MV, motion, outputs)
    }

    pub fn with_reference(
        adc: A,
        adc_max: u16,
        v_ref_mv: f32,
        motion: M,
        outputs: OutputPins<O>,
    ) -> Self {
        Self {
            adc,
            adc_max,
            v_ref_mv,
            motion,
            outputs,
        }
    }

    fn pin(&mut self, output: Output) -> &mut O {
        match output {
            Output::GreenLed => &mut self.outputs.green,
            Output::YellowLed => &mut self.outputs.yellow,
            Output::RedLed => &mut self.outputs.red,
            Output::Buzzer => &mut self.outputs.buzzer,
            Output::Relay => &mut self.outputs.relay,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<A, M, O> SensorPort for PinHardware<A, M, O>
where
    A: AdcChannel,
    M: InputPin,
    O: OutputPin,
{
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let raw = self.adc.read_raw().map_err(|e| {
            warn!("ADC read failed: {e:?}");
            SensorError::ReadFailed
        })?;
        Ok(adc_to_celsius(raw, self.adc_max, self.v_ref_mv))
    }

    fn read_motion(&mut self) -> bool {
        self.motion.is_high().unwrap_or_else(|e| {
            warn!("PIR read failed: {e:?}");
            false
        })
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<A, M, O> ActuatorPort for PinHardware<A, M, O>
where
    A: AdcChannel,
    M: InputPin,
    O: OutputPin,
{
    fn set_output(&mut self, output: Output, on: bool) {
        if let Err(e) = self.pin(output).set_state(PinState::from(on)) {
            error!("{output:?} write failed: {e:?}");
        }
    }
}
