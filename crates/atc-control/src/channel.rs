//! Shared-frequency contention.
//!
//! Each controller owns one [`Channel`].  A call may only go out while the
//! channel is available; every call marks it busy, and it becomes available
//! again once the controller's cooldown has elapsed since the last call.

use atc_core::SimTime;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    available:         bool,
    last_transmission: Option<SimTime>,
}

impl Default for Channel {
    fn default() -> Self {
        Self { available: true, last_transmission: None }
    }
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn last_transmission(&self) -> Option<SimTime> {
        self.last_transmission
    }

    /// Re-open the channel if more than `cooldown_secs` have passed since the
    /// last call.  Never closes it.
    pub fn refresh(&mut self, now: SimTime, cooldown_secs: i64) {
        if self.last_transmission.is_none_or(|t| now - t > cooldown_secs) {
            self.available = true;
        }
    }

    /// A call went out at `now`.
    pub fn mark_used(&mut self, now: SimTime) {
        self.available = false;
        self.last_transmission = Some(now);
    }

    /// Close without stamping a call; the next [`refresh`](Self::refresh)
    /// measures from the previous transmission.
    pub fn close(&mut self) {
        self.available = false;
    }
}
