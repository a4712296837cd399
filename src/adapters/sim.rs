//! Simulated peripherals for the host binary and tests.
//!
//! [`SimAdc`] plays back a temperature profile as raw ADC counts and
//! [`SimPin`] is a digital pin whose level is shared between clones, so a
//! test can keep a handle on a pin it has moved into an adapter.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use super::hardware::AdcChannel;
use crate::sensors::temperature::{ADC_MAX, V_REF_MV};

// ── ADC ───────────────────────────────────────────────────────

/// Conversion failure injected by a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimAdcFault;

enum Profile {
    /// Fixed sequence, repeated; `None` entries fail.
    Scripted(Vec<Option<u16>>),
    /// Triangle wave between two temperatures.
    Ramp {
        low_c: f32,
        high_c: f32,
        step_c: f32,
        current_c: f32,
        rising: bool,
    },
}

pub struct SimAdc {
    profile: Profile,
    position: usize,
}

impl SimAdc {
    /// Replay `samples` in order, wrapping at the end.
    pub fn scripted(samples: Vec<Option<u16>>) -> Self {
        Self {
            profile: Profile::Scripted(samples),
            position: 0,
        }
    }

    /// Climb from `low_c` to `high_c` by `step_c` per read, then back down.
    pub fn ramp(low_c: f32, high_c: f32, step_c: f32) -> Self {
        Self {
            profile: Profile::Ramp {
                low_c,
                high_c,
                step_c: step_c.abs(),
                current_c: low_c,
                rising: true,
            },
            position: 0,
        }
    }

    /// Raw counts an LM35 at `celsius` produces on the default converter.
    pub fn counts_for(celsius: f32) -> u16 {
        let millivolts = celsius * 10.0;
        (millivolts * f32::from(ADC_MAX) / V_REF_MV).round().max(0.0) as u16
    }
}

impl AdcChannel for SimAdc {
    type Error = SimAdcFault;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        match &mut self.profile {
            Profile::Scripted(samples) => {
                if samples.is_empty() {
                    return Err(SimAdcFault);
                }
                let sample = samples[self.position % samples.len()];
                self.position = self.position.wrapping_add(1);
                sample.ok_or(SimAdcFault)
            }
            Profile::Ramp {
                low_c,
                high_c,
                step_c,
                current_c,
                rising,
            } => {
                let reading = *current_c;
                if *rising {
                    *current_c += *step_c;
                    if *current_c >= *high_c {
                        *current_c = *high_c;
                        *rising = false;
                    }
                } else {
                    *current_c -= *step_c;
                    if *current_c <= *low_c {
                        *current_c = *low_c;
                        *rising = true;
                    }
                }
                Ok(Self::counts_for(reading))
            }
        }
    }
}

// ── Digital pin ───────────────────────────────────────────────

/// Digital pin with a shared level.
#[derive(Debug, Clone)]
pub struct SimPin {
    level: Rc<Cell<bool>>,
}

impl SimPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: Rc::new(Cell::new(high)),
        }
    }

    /// Drive the level from the outside (e.g. PIR stimulus).
    pub fn set(&self, high: bool) {
        self.level.set(high);
    }

    pub fn level(&self) -> bool {
        self.level.get()
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}
