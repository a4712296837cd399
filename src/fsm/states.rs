//! Concrete state handler functions and table builder.
//!
//! Each risk level is defined by plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.  Updates compare the fresh temperature against
//! the thresholds every evaluation; there is no hysteresis or debounce.
//!
//! ```text
//!            t >= warning            t >= danger
//!  NORMAL ──────────────────▶ WARNING ─────────────▶ DANGER
//!    ▲  ◀──────────────────     │  ◀─────────────      │
//!    │        t < warning       │    t < danger        │
//!    └──────────────────────────┴──────────────────────┘
//!              NORMAL ──[t >= danger]──▶ DANGER (direct)
//! ```

use super::context::{FsmContext, RiskThresholds};
use super::{RiskLevel, StateDescriptor};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; RiskLevel::COUNT] {
    [
        // Index 0: Normal
        StateDescriptor {
            id: RiskLevel::Normal,
            name: "Normal",
            on_enter: Some(normal_enter),
            on_exit: None,
            on_update: normal_update,
        },
        // Index 1: Warning
        StateDescriptor {
            id: RiskLevel::Warning,
            name: "Warning",
            on_enter: Some(warning_enter),
            on_exit: None,
            on_update: warning_update,
        },
        // Index 2: Danger
        StateDescriptor {
            id: RiskLevel::Danger,
            name: "Danger",
            on_enter: Some(danger_enter),
            on_exit: Some(danger_exit),
            on_update: danger_update,
        },
    ]
}

/// Stateless classification of a temperature.
pub fn classify(temperature_c: f32, thresholds: &RiskThresholds) -> RiskLevel {
    if temperature_c >= thresholds.danger_c {
        RiskLevel::Danger
    } else if temperature_c >= thresholds.warning_c {
        RiskLevel::Warning
    } else {
        RiskLevel::Normal
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL
// ═══════════════════════════════════════════════════════════════════════════

fn normal_enter(ctx: &mut FsmContext) {
    info!(
        "NORMAL: {:.1}\u{00b0}C below {:.1}\u{00b0}C",
        ctx.sensors.temperature_c, ctx.thresholds.warning_c
    );
}

fn normal_update(ctx: &mut FsmContext) -> Option<RiskLevel> {
    let t = ctx.sensors.temperature_c;
    if t >= ctx.thresholds.danger_c {
        return Some(RiskLevel::Danger);
    }
    if t >= ctx.thresholds.warning_c {
        return Some(RiskLevel::Warning);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  WARNING
// ═══════════════════════════════════════════════════════════════════════════

fn warning_enter(ctx: &mut FsmContext) {
    ctx.stats.warning_entries = ctx.stats.warning_entries.saturating_add(1);
    warn!(
        "WARNING: {:.1}\u{00b0}C reached warning threshold {:.1}\u{00b0}C (entry #{})",
        ctx.sensors.temperature_c, ctx.thresholds.warning_c, ctx.stats.warning_entries
    );
}

fn warning_update(ctx: &mut FsmContext) -> Option<RiskLevel> {
    let t = ctx.sensors.temperature_c;
    if t >= ctx.thresholds.danger_c {
        return Some(RiskLevel::Danger);
    }
    if t < ctx.thresholds.warning_c {
        return Some(RiskLevel::Normal);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DANGER
// ═══════════════════════════════════════════════════════════════════════════

fn danger_enter(ctx: &mut FsmContext) {
    ctx.stats.danger_entries = ctx.stats.danger_entries.saturating_add(1);
    warn!(
        "DANGER: {:.1}\u{00b0}C reached danger threshold {:.1}\u{00b0}C (entry #{})",
        ctx.sensors.temperature_c, ctx.thresholds.danger_c, ctx.stats.danger_entries
    );
}

fn danger_exit(ctx: &mut FsmContext) {
    info!(
        "DANGER: cleared after {} evaluations",
        ctx.evaluations_in_level
    );
}

fn danger_update(ctx: &mut FsmContext) -> Option<RiskLevel> {
    let t = ctx.sensors.temperature_c;
    if t < ctx.thresholds.danger_c {
        return Some(classify(t, &ctx.thresholds));
    }
    None
}
