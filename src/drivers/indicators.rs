//! Indicator engine: LED and buzzer patterns per risk level.
//!
//! The service calls `render()` every loop tick with the current risk level
//! and monotonic time; the engine returns the [`OutputFrame`] to drive.
//!
//! | Level   | LEDs                                  | Buzzer               |
//! |---------|---------------------------------------|----------------------|
//! | Normal  | green solid, yellow/red off           | off                  |
//! | Warning | yellow toggles every 1000 ms          | toggles every 2000 ms|
//! | Danger  | red toggles every 200 ms              | continuous           |
//!
//! Each blinking output owns its phase and its last-toggle timestamp.
//! Both persist across level changes: a new level switches the active
//! outputs at once and shows the stored phase until that output's next
//! due toggle.  Only `reset()` clears them.
//!
//! `render()` is idempotent for a fixed `now_ms`: a toggle consumes the
//! elapsed period, so a second call at the same instant sees nothing due.

use crate::app::ports::Output;
use crate::config::MonitorConfig;
use crate::fsm::RiskLevel;

/// Desired level of every output for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFrame {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
    pub buzzer: bool,
    pub relay: bool,
}

impl OutputFrame {
    /// Power-on / reset state: green on, everything else off.
    pub const fn idle() -> Self {
        Self {
            green: true,
            yellow: false,
            red: false,
            buzzer: false,
            relay: false,
        }
    }

    pub fn get(&self, output: Output) -> bool {
        match output {
            Output::GreenLed => self.green,
            Output::YellowLed => self.yellow,
            Output::RedLed => self.red,
            Output::Buzzer => self.buzzer,
            Output::Relay => self.relay,
        }
    }

    /// Set all three LEDs at once.
    pub fn set_leds(&mut self, on: bool) {
        self.green = on;
        self.yellow = on;
        self.red = on;
    }
}

/// A square wave with its own toggle timer.
#[derive(Debug, Clone, Copy)]
struct Blinker {
    period_ms: u32,
    on: bool,
    /// `None` until the first toggle; the first advance toggles at once.
    last_toggle_ms: Option<u64>,
}

impl Blinker {
    const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            on: false,
            last_toggle_ms: None,
        }
    }

    fn advance(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_toggle_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= u64::from(self.period_ms));
        if due {
            self.on = !self.on;
            self.last_toggle_ms = Some(now_ms);
        }
        self.on
    }

    fn reset(&mut self) {
        self.on = false;
        self.last_toggle_ms = None;
    }
}

pub struct IndicatorEngine {
    yellow: Blinker,
    red: Blinker,
    buzzer: Blinker,
}

impl IndicatorEngine {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            yellow: Blinker::new(config.warning_blink_ms),
            red: Blinker::new(config.danger_blink_ms),
            buzzer: Blinker::new(config.warning_buzzer_ms),
        }
    }

    /// Compute the frame for `level` at `now_ms`.
    /// Only the blinkers the level uses are advanced.
    pub fn render(&mut self, level: RiskLevel, now_ms: u64) -> OutputFrame {
        match level {
            RiskLevel::Normal => OutputFrame::idle(),
            RiskLevel::Warning => OutputFrame {
                yellow: self.yellow.advance(now_ms),
                buzzer: self.buzzer.advance(now_ms),
                ..OutputFrame::default()
            },
            RiskLevel::Danger => OutputFrame {
                red: self.red.advance(now_ms),
                buzzer: true,
                ..OutputFrame::default()
            },
        }
    }

    /// Forget all phases and timers.
    pub fn reset(&mut self) {
        self.yellow.reset();
        self.red.reset();
        self.buzzer.reset();
    }
}
