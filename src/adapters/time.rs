//! Host time adapter.
//!
//! Provides monotonic time for the polling loop from
//! `std::time::Instant`.  A board build supplies its own [`Clock`] over a
//! hardware timer.

use std::time::Instant;

use crate::app::ports::Clock;

/// Milliseconds since the adapter was created.
pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for HostClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
