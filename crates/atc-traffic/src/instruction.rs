//! The instruction a controller currently imposes on one aircraft.

/// Hold / speed / heading / altitude directives plus their numeric targets.
///
/// A target is only meaningful while its `change_*` flag is set.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub hold_pattern:          bool,
    pub hold_position:         bool,
    pub change_speed:          bool,
    pub change_heading:        bool,
    pub change_altitude:       bool,
    /// Set when the aircraft sits in a waits-for cycle; a higher-level
    /// policy decides what to do about it.
    pub resolve_circular_wait: bool,

    pub speed_kts:   f64,
    pub heading_deg: f64,
    pub altitude_ft: f64,
}

impl Instruction {
    /// `true` if any directive is active.
    pub fn has_instruction(&self) -> bool {
        self.hold_pattern
            || self.hold_position
            || self.change_speed
            || self.change_heading
            || self.change_altitude
            || self.resolve_circular_wait
    }

    pub fn set_speed(&mut self, speed_kts: f64) {
        self.change_speed = true;
        self.speed_kts = speed_kts;
    }

    pub fn clear_speed(&mut self) {
        self.change_speed = false;
    }

    pub fn set_heading(&mut self, heading_deg: f64) {
        self.change_heading = true;
        self.heading_deg = heading_deg;
    }

    pub fn clear_heading(&mut self) {
        self.change_heading = false;
    }

    pub fn set_altitude(&mut self, altitude_ft: f64) {
        self.change_altitude = true;
        self.altitude_ft = altitude_ft;
    }

    pub fn clear_altitude(&mut self) {
        self.change_altitude = false;
    }
}
