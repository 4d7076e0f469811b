//! Pure countdown state.
//!
//! No clocks live here: whoever owns a `Countdown` decides when a second has
//! passed and calls [`Countdown::tick`].

use crate::time::format_countdown;

/// Result of asking a countdown to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// Zero remaining in a cycle that has not expired yet; the caller must
    /// deliver expiry now.
    ExpiredImmediately,
    /// The cycle already expired. Nothing happens until `reset`.
    Exhausted,
}

/// Result of one elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_secs: u32,
    pub expired: bool,
}

/// How close the countdown is to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Calm,
    Caution,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownSnapshot {
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub running: bool,
    pub expired: bool,
}

impl CountdownSnapshot {
    /// Thresholds at 50%, 25% and 10% of the duration remaining.
    #[must_use]
    pub fn urgency(&self) -> Urgency {
        if self.duration_secs == 0 {
            return Urgency::Critical;
        }
        let remaining = u64::from(self.remaining_secs) * 100;
        let duration = u64::from(self.duration_secs);
        if remaining <= duration * 10 {
            Urgency::Critical
        } else if remaining <= duration * 25 {
            Urgency::Warning
        } else if remaining <= duration * 50 {
            Urgency::Caution
        } else {
            Urgency::Calm
        }
    }

    #[must_use]
    pub fn display(&self) -> String {
        format_countdown(self.remaining_secs)
    }

    /// Fraction of the duration already used, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration_secs == 0 {
            return 1.0;
        }
        let used = self.duration_secs.saturating_sub(self.remaining_secs);
        #[allow(clippy::cast_precision_loss)]
        let ratio = used as f32 / self.duration_secs as f32;
        ratio.clamp(0.0, 1.0)
    }
}

/// Remaining-time bookkeeping for one countdown.
///
/// `remaining_secs` stays within `[0, duration_secs]`, only decreases while
/// running, and expiry is reported at most once per cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration_secs: u32,
    remaining_secs: u32,
    running: bool,
    expired: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            expired: false,
        }
    }

    pub fn start(&mut self) -> StartOutcome {
        if self.running {
            return StartOutcome::AlreadyRunning;
        }
        if self.remaining_secs == 0 {
            if self.expired {
                return StartOutcome::Exhausted;
            }
            self.expired = true;
            return StartOutcome::ExpiredImmediately;
        }
        self.running = true;
        StartOutcome::Started
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.running = false;
        self.expired = false;
    }

    /// Consumes one second. Returns `None` when not running.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let expired = self.remaining_secs == 0 && !self.expired;
        if self.remaining_secs == 0 {
            self.running = false;
            self.expired = true;
        }
        Some(TickOutcome {
            remaining_secs: self.remaining_secs,
            expired,
        })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            running: self.running,
            expired: self.expired,
        }
    }
}
