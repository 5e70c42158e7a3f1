//! Scripted radio messages.
//!
//! The core decides *what* is said and by whom; turning a [`MessageKind`]
//! into display text or audio is left to whoever observes the
//! [`Transmission`].

use atc_core::{AircraftId, SimTime};

use crate::ControllerKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    AirToGround,
    GroundToAir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    AnnounceEngineStart,
    RequestEngineStart,
    PermitEngineStart,
    DenyEngineStart,
    AcknowledgeEngineStart,
    RequestPushbackClearance,
    PermitPushbackClearance,
    HoldPushbackClearance,
    AcknowledgeSwitchGroundFrequency,
    InitiateContact,
    AcknowledgeInitiateContact,
    RequestTaxiClearance,
    IssueTaxiClearance,
    AcknowledgeTaxiClearance,
    HoldPosition,
    AcknowledgeHoldPosition,
    ResumeTaxi,
    AcknowledgeResumeTaxi,
    ReportRunwayHoldShort,
    AcknowledgeReportRunwayHoldShort,
    SwitchTowerFrequency,
    AcknowledgeSwitchTowerFrequency,
}

impl MessageKind {
    /// Who speaks: pilot calls go air-to-ground, controller calls the other way.
    pub fn direction(self) -> Direction {
        use MessageKind::*;
        match self {
            PermitEngineStart
            | DenyEngineStart
            | PermitPushbackClearance
            | HoldPushbackClearance
            | AcknowledgeInitiateContact
            | IssueTaxiClearance
            | HoldPosition
            | ResumeTaxi
            | AcknowledgeReportRunwayHoldShort
            | SwitchTowerFrequency => Direction::GroundToAir,
            _ => Direction::AirToGround,
        }
    }

    pub fn as_str(self) -> &'static str {
        use MessageKind::*;
        match self {
            AnnounceEngineStart              => "announce_engine_start",
            RequestEngineStart               => "request_engine_start",
            PermitEngineStart                => "permit_engine_start",
            DenyEngineStart                  => "deny_engine_start",
            AcknowledgeEngineStart           => "acknowledge_engine_start",
            RequestPushbackClearance         => "request_pushback_clearance",
            PermitPushbackClearance          => "permit_pushback_clearance",
            HoldPushbackClearance            => "hold_pushback_clearance",
            AcknowledgeSwitchGroundFrequency => "acknowledge_switch_ground_frequency",
            InitiateContact                  => "initiate_contact",
            AcknowledgeInitiateContact       => "acknowledge_initiate_contact",
            RequestTaxiClearance             => "request_taxi_clearance",
            IssueTaxiClearance               => "issue_taxi_clearance",
            AcknowledgeTaxiClearance         => "acknowledge_taxi_clearance",
            HoldPosition                     => "hold_position",
            AcknowledgeHoldPosition          => "acknowledge_hold_position",
            ResumeTaxi                       => "resume_taxi",
            AcknowledgeResumeTaxi            => "acknowledge_resume_taxi",
            ReportRunwayHoldShort            => "report_runway_hold_short",
            AcknowledgeReportRunwayHoldShort => "acknowledge_report_runway_hold_short",
            SwitchTowerFrequency             => "switch_tower_frequency",
            AcknowledgeSwitchTowerFrequency  => "acknowledge_switch_tower_frequency",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted radio call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transmission {
    pub time:       SimTime,
    pub controller: ControllerKind,
    pub aircraft:   AircraftId,
    pub sender:     String,
    pub receiver:   String,
    pub kind:       MessageKind,
    pub direction:  Direction,
    /// `false` for calls that only belong in a dialog log.
    pub audible:    bool,
    /// Station frequency ×100 (e.g. 12180 for 121.80 MHz); 0 if unknown.
    pub frequency:  u32,
}
