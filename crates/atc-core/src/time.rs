//! Simulation time model.
//!
//! # Design
//!
//! Every time-dependent decision (segment reservations, runway slots, channel
//! cooldowns, dialogue timing) compares whole seconds on one explicit clock
//! that the caller advances each tick:
//!
//!   now = start_unix_secs + floor(elapsed_secs)
//!
//! Fractional `dt` values accumulate in `elapsed_secs`, so a 60 Hz frame loop
//! advances `now` by exactly one second every 60 frames.

use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation time in whole seconds.
///
/// Signed, because reservation arithmetic subtracts grace windows from
/// near-zero times in tests and at sim start.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub i64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// `self` plus a fractional number of seconds, truncated toward zero.
    #[inline]
    pub fn plus_secs_f64(self, secs: f64) -> SimTime {
        SimTime(self.0 + secs as i64)
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: SimTime) -> i64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<i64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: i64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub<i64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: i64) -> SimTime {
        SimTime(self.0 - rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: SimTime) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The single simulation clock threaded through every controller call.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Absolute time (seconds) of the clock's origin.
    pub start_unix_secs: i64,
    /// Simulated seconds accumulated through [`advance`](Self::advance).
    pub elapsed_secs:    f64,
}

impl SimClock {
    pub fn new(start_unix_secs: i64) -> Self {
        Self { start_unix_secs, elapsed_secs: 0.0 }
    }

    /// Advance by `dt` simulated seconds.  Negative steps are ignored.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.elapsed_secs += dt;
        }
    }

    /// Current absolute time in whole seconds.
    #[inline]
    pub fn now(&self) -> SimTime {
        SimTime(self.start_unix_secs + self.elapsed_secs.floor() as i64)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.elapsed_secs.max(0.0) as u64;
        write!(
            f,
            "{} ({:02}:{:02}:{:02} elapsed)",
            self.now(),
            total / 3_600,
            (total % 3_600) / 60,
            total % 60
        )
    }
}
