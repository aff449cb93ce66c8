//! Session countdown.
//!
//! The countdown itself does not sleep. A front end delivers one
//! [`Countdown::tick`] per second while a session is active; the countdown
//! reports expiry exactly once and then stays disarmed.

/// Below this many seconds the remaining time is shown as urgent.
pub const URGENT_BELOW_SECS: u32 = 5 * 60;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; seconds left after this tick.
    Running(u32),
    /// Time ran out on this tick. Returned once per arming.
    Expired,
    /// The countdown is not armed; nothing happened.
    Idle,
}

/// One-second-granularity countdown with an explicit disarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total: u32,
    remaining: u32,
    armed: bool,
}

impl Countdown {
    /// A disarmed countdown holding `total` seconds.
    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: total,
            armed: false,
        }
    }

    /// Reset to the full duration and start counting.
    pub fn arm(&mut self) {
        self.remaining = self.total;
        self.armed = true;
    }

    /// Stop counting, keeping the remaining time.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_urgent(&self) -> bool {
        self.remaining < URGENT_BELOW_SECS
    }

    /// Advance one second.
    pub fn tick(&mut self) -> Tick {
        if !self.armed {
            return Tick::Idle;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.armed = false;
            return Tick::Expired;
        }
        self.remaining -= 1;
        Tick::Running(self.remaining)
    }
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render seconds as `Xm Ys`.
pub fn format_duration(secs: u32) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}
