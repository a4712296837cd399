//! Suppression controller.
//!
//! Guards the suppression relay.  Activation is one-shot per Danger
//! episode: once fired, the latch stays set until the risk level falls
//! back to Normal (or the operator issues RESET).  A new episode that
//! starts while the previous sequence is still running restarts it.
//!
//! The confirmation sequence is a timed sub-state machine advanced from
//! the main loop, so sensing and command handling keep running while the
//! relay is energised.
//!
//! ```text
//!            maybe_activate()
//!   IDLE ─────────────────────▶ FLASHING ──[cycles × 2 × phase]──▶ HOLDING
//!    ▲                          relay on,   ▲                      relay on
//!    │                          LEDs on/off └──maybe_activate()───────┤
//!    └──────────────────────────[dwell elapsed]───────────────────────┘
//!                                relay off
//! ```

use crate::config::MonitorConfig;
use crate::drivers::indicators::OutputFrame;
use crate::fsm::RiskLevel;
use crate::sensors::temperature::TemperatureReading;
use log::{info, warn};

/// Where the confirmation sequence currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionPhase {
    Idle,
    Flashing { started_ms: u64 },
    Holding { since_ms: u64 },
}

/// Context the controller cannot see on its own.
#[derive(Debug, Clone, Copy)]
pub struct ActivationInputs {
    /// Completed sensor refreshes so far.
    pub total_readings: u32,
    pub integrity_ok: bool,
}

/// Phase changes reported by [`SuppressionController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionEvent {
    /// Confirmation flashes finished; relay holding.
    FlashComplete,
    /// Dwell elapsed; relay released.
    Released,
}

pub struct SuppressionController {
    danger_c: f32,
    min_readings: u32,
    flash_phase_ms: u32,
    flash_cycles: u8,
    dwell_ms: u32,
    latched: bool,
    activations: u32,
    phase: SuppressionPhase,
}

impl SuppressionController {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            danger_c: config.danger_threshold_c,
            min_readings: config.suppression_min_readings,
            flash_phase_ms: config.suppression_flash_phase_ms,
            flash_cycles: config.suppression_flash_cycles,
            dwell_ms: config.suppression_dwell_ms,
            latched: false,
            activations: 0,
            phase: SuppressionPhase::Idle,
        }
    }

    /// Fire the relay if every gate holds.  Returns `true` on activation.
    pub fn maybe_activate(
        &mut self,
        level: RiskLevel,
        reading: &TemperatureReading,
        inputs: &ActivationInputs,
        now_ms: u64,
    ) -> bool {
        if level != RiskLevel::Danger
            || reading.celsius < self.danger_c
            || inputs.total_readings < self.min_readings
            || self.latched
        {
            return false;
        }
        if !inputs.integrity_ok {
            warn!(
                "Suppression: withheld at {:.1}\u{00b0}C, sensor integrity lost",
                reading.celsius
            );
            return false;
        }

        if self.is_active() {
            info!("Suppression: new episode, sequence restarted");
        }
        self.latched = true;
        self.activations = self.activations.saturating_add(1);
        self.phase = SuppressionPhase::Flashing { started_ms: now_ms };
        warn!(
            "Suppression: ACTIVATED at {:.1}\u{00b0}C (activation #{})",
            reading.celsius, self.activations
        );
        true
    }

    /// Move the sequence along.  Call once per tick.
    pub fn advance(&mut self, now_ms: u64) -> Option<SuppressionEvent> {
        match self.phase {
            SuppressionPhase::Idle => None,
            SuppressionPhase::Flashing { started_ms } => {
                if now_ms.saturating_sub(started_ms) < self.flash_duration_ms() {
                    return None;
                }
                self.phase = SuppressionPhase::Holding { since_ms: now_ms };
                Some(SuppressionEvent::FlashComplete)
            }
            SuppressionPhase::Holding { since_ms } => {
                if now_ms.saturating_sub(since_ms) < u64::from(self.dwell_ms) {
                    return None;
                }
                self.phase = SuppressionPhase::Idle;
                info!("Suppression: relay released");
                Some(SuppressionEvent::Released)
            }
        }
    }

    /// Apply relay and LED overrides to an already-rendered frame.
    pub fn overlay(&self, frame: &mut OutputFrame, now_ms: u64) {
        match self.phase {
            SuppressionPhase::Idle => frame.relay = false,
            SuppressionPhase::Flashing { started_ms } => {
                frame.relay = true;
                let phase = now_ms.saturating_sub(started_ms) / u64::from(self.flash_phase_ms.max(1));
                frame.set_leds(phase % 2 == 0);
            }
            SuppressionPhase::Holding { .. } => frame.relay = true,
        }
    }

    /// Risk returned to Normal: the next Danger episode may fire again.
    pub fn clear_latch(&mut self) {
        if self.latched {
            info!("Suppression: latch cleared");
        }
        self.latched = false;
    }

    /// Stop any running sequence and clear the latch.  Used by RESET.
    pub fn abort(&mut self) {
        if self.is_active() {
            info!("Suppression: sequence aborted");
        }
        self.phase = SuppressionPhase::Idle;
        self.latched = false;
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Relay currently energised.
    pub fn is_active(&self) -> bool {
        self.phase != SuppressionPhase::Idle
    }

    pub fn phase(&self) -> SuppressionPhase {
        self.phase
    }

    /// Lifetime activation count.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    fn flash_duration_ms(&self) -> u64 {
        u64::from(self.flash_cycles) * 2 * u64::from(self.flash_phase_ms)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
