//! Due-time scheduler for the polling loop.
//!
//! The main loop ticks far faster than anything periodic needs to run.
//! Each tick the service asks the scheduler which [`Task`]s are due at
//! the current monotonic time and runs only those.
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │  loop tick (every loop_interval_ms)                │
//! │                                                    │
//! │   Clock ──now_ms──▶ Scheduler::poll()              │
//! │                        │                           │
//! │            ┌───────────┴────────────┐              │
//! │            ▼                        ▼              │
//! │     SensorRefresh (1 s)      Telemetry (30 s)      │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! A late tick fires a task once, not once per missed interval, and the
//! next deadline is measured from the late fire.

use log::info;

// ═══════════════════════════════════════════════════════════════
//  Schedule types
// ═══════════════════════════════════════════════════════════════

/// Work the service knows how to run on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    SensorRefresh,
    Telemetry,
}

/// A single schedule entry.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// Human-readable label for the log.
    pub label: &'static str,
    pub task: Task,
    pub interval_ms: u32,
    /// Fire on the first poll instead of waiting one full interval.
    pub fire_immediately: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent schedules (stack-allocated).
pub const MAX_SCHEDULES: usize = 4;

/// Tasks due in one poll.
pub type DueTasks = heapless::Vec<Task, MAX_SCHEDULES>;

pub struct Scheduler {
    schedules: [Option<ScheduleEntry>; MAX_SCHEDULES],
}

/// Internal bookkeeping for a live schedule.
#[derive(Debug, Clone, Copy)]
struct ScheduleEntry {
    schedule: Schedule,
    /// `None` until the first poll after `add`.
    last_fired_ms: Option<u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: [None; MAX_SCHEDULES],
        }
    }

    /// Add a schedule.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, schedule: Schedule) -> Option<usize> {
        let (i, slot) = self
            .schedules
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())?;
        info!(
            "Scheduler: added '{}' every {} ms at slot {}",
            schedule.label, schedule.interval_ms, i
        );
        *slot = Some(ScheduleEntry {
            schedule,
            last_fired_ms: None,
        });
        Some(i)
    }

    /// Collect the tasks due at `now_ms`, in slot order.
    pub fn poll(&mut self, now_ms: u64) -> DueTasks {
        let mut due = DueTasks::new();

        for entry in self.schedules.iter_mut().flatten() {
            let fire = match entry.last_fired_ms {
                Some(last) => {
                    now_ms.saturating_sub(last) >= u64::from(entry.schedule.interval_ms)
                }
                None if entry.schedule.fire_immediately => true,
                None => {
                    // Anchor the first interval at the first poll.
                    entry.last_fired_ms = Some(now_ms);
                    false
                }
            };

            if fire {
                entry.last_fired_ms = Some(now_ms);
                // Capacity equals the slot count, so this cannot overflow.
                let _ = due.push(entry.schedule.task);
            }
        }

        due
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
