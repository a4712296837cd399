//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, outputs, command line, event sinks, clock)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::SensorError;

/// Characters kept from one operator line.
pub const LINE_CAPACITY: usize = 64;

/// One line received from the operator, bounded so a runaway sender cannot
/// grow memory.  A line that did not fit is marked truncated and the
/// gateway rejects it as too long, whatever the kept prefix says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    text: heapless::String<LINE_CAPACITY>,
    truncated: bool,
}

impl CommandLine {
    /// Copy as many whole characters of `raw` as fit.
    pub fn bounded(raw: &str) -> Self {
        let mut line = Self::default();
        for c in raw.chars() {
            if line.text.push(c).is_err() {
                line.truncated = true;
                break;
            }
        }
        line
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The sender's line was longer than [`LINE_CAPACITY`].
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch.  Never decreases.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain raw sensor data.
/// No validation happens here; that is the gateway's job.
pub trait SensorPort {
    /// Acquire one temperature sample in °C.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Current state of the motion (PIR) input.
    fn read_motion(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Every digital output the monitor drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    GreenLed,
    YellowLed,
    RedLed,
    Buzzer,
    Relay,
}

impl Output {
    pub const ALL: [Self; 5] = [
        Self::GreenLed,
        Self::YellowLed,
        Self::RedLed,
        Self::Buzzer,
        Self::Relay,
    ];
}

/// Write-side port: the domain calls this to drive outputs.
pub trait ActuatorPort {
    /// Drive one output high (`true`) or low.
    fn set_output(&mut self, output: Output, on: bool);

    /// Everything low: the safe state.
    fn all_off(&mut self) {
        for output in Output::ALL {
            self.set_output(output, false);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Command channel (driving adapter: operator ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Line-oriented operator channel (serial console, stdin, …).
pub trait CommandChannel {
    /// Non-blocking: the next complete line, if any.
    fn try_receive_line(&mut self) -> Option<CommandLine>;

    /// Send one response line back to the operator.
    fn send(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
