//! Tunable constants for routing, reservation, conflict detection and the
//! radio channel.
//!
//! Typically loaded from JSON/TOML by the application crate (with the `serde`
//! feature) and handed to `AtcManager`.  [`AtcConfig::default`] reproduces
//! the stock behaviour.

use crate::{AtcError, AtcResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AtcConfig {
    /// Master RNG seed.  The same seed always produces identical dialogues.
    pub seed: u64,

    // ── Reservation scheduler ─────────────────────────────────────────────
    /// Minimum spacing between two arrival slots on one runway.
    pub arrival_separation_secs: i64,
    /// Subtracted from every computed segment block time.
    pub reservation_grace_secs:  i64,

    // ── Conflict detection ────────────────────────────────────────────────
    /// Maximum bearing difference for two aircraft to count as aligned.
    pub heading_alignment_deg: f64,
    /// Initial search radius for the closest-aircraft scan.
    pub proximity_search_m:    f64,
    /// Radius multiplier of the safety envelope (`f * r1 + f * r2`).
    pub envelope_factor:       f64,
    /// Hold look-ahead along the intentions, in aircraft radii.
    pub hold_lookahead_radii:  f64,
    /// Pushback is withheld while the user aircraft is closer than this.
    pub pushback_user_clearance_m: f64,

    // ── Radio channel ─────────────────────────────────────────────────────
    pub startup_cooldown_min_secs:    i64,
    /// Startup cooldown is `min + rand(0..span)`; 0 disables the jitter.
    pub startup_cooldown_span_secs:   i64,
    pub ground_hold_cooldown_secs:    i64,
    pub taxi_clearance_cooldown_secs: i64,

    // ── Route finder ──────────────────────────────────────────────────────
    /// Applied to the network by `AtcManagerBuilder::build`.
    pub parking_penalty: f64,
    pub runway_penalty:  f64,
}

impl Default for AtcConfig {
    fn default() -> Self {
        Self {
            seed: 42,

            arrival_separation_secs: 60,
            reservation_grace_secs:  30,

            heading_alignment_deg:     60.0,
            proximity_search_m:        1_000.0,
            envelope_factor:           1.1,
            hold_lookahead_radii:      4.0,
            pushback_user_clearance_m: 250.0,

            startup_cooldown_min_secs:    3,
            startup_cooldown_span_secs:   15,
            ground_hold_cooldown_secs:    2,
            taxi_clearance_cooldown_secs: 15,

            parking_penalty: 10_000.0,
            runway_penalty:  1_000.0,
        }
    }
}

impl AtcConfig {
    /// Reject values that would make the scheduler or detector misbehave.
    pub fn validate(&self) -> AtcResult<()> {
        if self.arrival_separation_secs <= 0 {
            return Err(AtcError::Config(format!(
                "arrival_separation_secs must be positive, got {}",
                self.arrival_separation_secs
            )));
        }
        if self.reservation_grace_secs < 0 {
            return Err(AtcError::Config("reservation_grace_secs must not be negative".into()));
        }
        if !(0.0..=180.0).contains(&self.heading_alignment_deg) {
            return Err(AtcError::Config(format!(
                "heading_alignment_deg must lie in [0, 180], got {}",
                self.heading_alignment_deg
            )));
        }
        if self.envelope_factor <= 0.0 || self.proximity_search_m <= 0.0 {
            return Err(AtcError::Config("envelope_factor and proximity_search_m must be positive".into()));
        }
        if self.startup_cooldown_min_secs < 0
            || self.startup_cooldown_span_secs < 0
            || self.ground_hold_cooldown_secs < 0
            || self.taxi_clearance_cooldown_secs < 0
        {
            return Err(AtcError::Config("channel cooldowns must not be negative".into()));
        }
        if self.parking_penalty < 0.0 || self.runway_penalty < 0.0 {
            return Err(AtcError::Config("route penalties must not be negative".into()));
        }
        Ok(())
    }
}
