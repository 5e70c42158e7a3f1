//! `atc-traffic` — who is where, and where they mean to go.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`aircraft`]    | `Aircraft`, `Fleet` (owning arena), `TakeoffStatus`       |
//! | [`instruction`] | `Instruction` (hold / speed / heading / altitude flags)   |
//! | [`record`]      | `TrafficRecord`, `Kinematics`                             |
//! | [`relations`]   | crossing, on-route and opposing-path tests                |
//! | [`table`]       | `TrafficTable` (one controller's ordered traffic)         |
//! | [`error`]       | `TrafficError`, `TrafficResult<T>`                        |
//!
//! The [`Fleet`] owns every aircraft.  Traffic records refer to aircraft by
//! [`AircraftId`](atc_core::AircraftId) only, so a removed aircraft shows up
//! as a failed lookup, never as a dangling reference.

pub mod aircraft;
pub mod error;
pub mod instruction;
pub mod record;
pub mod relations;
pub mod table;


pub use aircraft::{Aircraft, Fleet, FlightRules, TakeoffStatus};
pub use error::{TrafficError, TrafficResult};
pub use instruction::Instruction;
pub use record::{Kinematics, TrafficRecord};
pub use table::TrafficTable;
