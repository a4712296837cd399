//! Function-pointer risk state machine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌───────────┬───────────┬──────────┬─────────────────┐  │
//! │  │ RiskLevel │ on_enter  │ on_exit  │ on_update       │  │
//! │  ├───────────┼───────────┼──────────┼─────────────────┤  │
//! │  │ Normal    │ fn(ctx)   │ —        │ fn(ctx)->Option │  │
//! │  │ Warning   │ fn(ctx)   │ —        │ fn(ctx)->Option │  │
//! │  │ Danger    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │  │
//! │  └───────────┴───────────┴──────────┴─────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each sensor refresh the engine calls `on_update` for the **current**
//! level.  If it returns `Some(next)`, the engine runs `on_exit` for the
//! current level, then `on_enter` for the next, and reports the transition
//! in the returned [`Assessment`].  Entry handlers record Warning/Danger
//! entries in the context statistics, so each entry is counted exactly once
//! no matter how many evaluations the episode lasts.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Risk level (state identity)
// ---------------------------------------------------------------------------

/// Fire-risk classification, ordered by severity.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum RiskLevel {
    Normal = 0,
    Warning = 1,
    Danger = 2,
}

impl RiskLevel {
    /// Total number of levels, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `RiskLevel`.  Panics on out-of-range in
    /// debug builds; returns `Danger` in release (fail towards alarm).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Normal,
            1 => Self::Warning,
            2 => Self::Danger,
            _ => {
                debug_assert!(false, "invalid risk index: {idx}");
                Self::Danger
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-evaluation update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<RiskLevel>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: RiskLevel,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub level: RiskLevel,
    pub previous: RiskLevel,
    pub transitioned: bool,
}

impl Assessment {
    /// True when this evaluation moved the monitor back into Normal.
    pub fn entered_normal(&self) -> bool {
        self.transitioned && self.level == RiskLevel::Normal
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `RiskLevel as usize`.
    table: [StateDescriptor; RiskLevel::COUNT],
    /// Index of the current level.
    current: usize,
    evaluations: u64,
    /// Evaluation count at which the current level was entered.
    level_entry_evaluation: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; RiskLevel::COUNT], initial: RiskLevel) -> Self {
        Self {
            table,
            current: initial as usize,
            evaluations: 0,
            level_entry_evaluation: 0,
        }
    }

    /// Run the initial `on_enter` for the starting level.
    /// Call once after construction, before the first `evaluate()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in level: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Evaluate the current `ctx.sensors` snapshot.
    pub fn evaluate(&mut self, ctx: &mut FsmContext) -> Assessment {
        self.evaluations += 1;
        ctx.evaluations_in_level = self.evaluations - self.level_entry_evaluation;

        let previous = self.current_level();
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_level) = next {
            self.transition(next_level, ctx);
        }

        let level = self.current_level();
        Assessment {
            level,
            previous,
            transitioned: level != previous,
        }
    }

    /// Force an immediate transition (used by RESET).
    pub fn force_transition(&mut self, next: RiskLevel, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_level(&self) -> RiskLevel {
        RiskLevel::from_index(self.current)
    }

    /// How many evaluations the FSM has spent in the current level.
    pub fn evaluations_in_current_level(&self) -> u64 {
        self.evaluations - self.level_entry_evaluation
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: RiskLevel, ctx: &mut FsmContext) {
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.level_entry_evaluation = self.evaluations;
        ctx.evaluations_in_level = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
