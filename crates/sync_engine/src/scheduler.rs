//! Cancelable frame tick.
//!
//! Each `start` opens a new generation; `cancel` closes it. A tick carries the
//! token of the generation it was scheduled under, so a tick scheduled before
//! a cancel is a no-op. A tick cannot be entered while another is running.

use std::time::Duration;

/// Ticket for one scheduler generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    generation: u64,
    running: bool,
    in_tick: bool,
    next_due: Duration,
}

impl FrameScheduler {
    pub fn new(tick_hz: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / tick_hz.max(1),
            generation: 0,
            running: false,
            in_tick: false,
            next_due: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking; returns the live token if already running
    pub fn start(&mut self, now: Duration) -> TickToken {
        if !self.running {
            self.generation += 1;
            self.running = true;
            self.next_due = now;
        }
        TickToken(self.generation)
    }

    /// Stop ticking and invalidate every outstanding token
    pub fn cancel(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Token of a tick that should run at `now`
    pub fn due(&self, now: Duration) -> Option<TickToken> {
        (self.running && !self.in_tick && now >= self.next_due).then_some(TickToken(self.generation))
    }

    /// Enter a tick. False for a stale token or while another tick runs.
    pub fn enter(&mut self, token: TickToken, now: Duration) -> bool {
        if !self.running || self.in_tick || token.0 != self.generation {
            return false;
        }
        self.in_tick = true;
        self.next_due = now + self.interval;
        true
    }

    pub fn exit(&mut self) {
        self.in_tick = false;
    }
}
