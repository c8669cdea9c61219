//! Cycle timing
//!
//! Fire times are millisecond offsets from start-up: one initial check at
//! `initial_delay_ms`, then regular ticks at every multiple of
//! `interval_ms`. The board maps offsets onto its monotonic timer.
//!
//! Cycles run one after another on a single task. A cycle that runs past
//! one or more tick boundaries does not queue them up; the missed ticks are
//! skipped and reported.

use crate::config::ScheduleConfig;

/// Next time a cycle should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fire {
    /// Milliseconds since start-up
    pub at_ms: u64,
    /// Regular ticks dropped because the previous cycle overran them
    pub skipped: u32,
}

#[derive(Debug, Clone)]
pub struct Schedule {
    interval_ms: u64,
    initial_ms: Option<u64>,
    next_tick_ms: u64,
}

impl Schedule {
    pub fn new(config: &ScheduleConfig) -> Self {
        // A zero interval would never advance
        let interval_ms = config.interval_ms.max(1);
        Self {
            interval_ms,
            initial_ms: Some(config.initial_delay_ms),
            next_tick_ms: interval_ms,
        }
    }

    /// Work out the next fire time, given the current offset `now_ms`.
    pub fn next_fire(&mut self, now_ms: u64) -> Fire {
        let mut skipped = 0;
        while self.next_tick_ms < now_ms {
            self.next_tick_ms += self.interval_ms;
            skipped += 1;
        }

        if let Some(initial) = self.initial_ms.take() {
            if initial >= now_ms && initial < self.next_tick_ms {
                return Fire {
                    at_ms: initial,
                    skipped,
                };
            }
        }

        let at_ms = self.next_tick_ms;
        self.next_tick_ms += self.interval_ms;
        Fire { at_ms, skipped }
    }
}
