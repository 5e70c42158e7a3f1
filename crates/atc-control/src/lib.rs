//! `atc-control` — the controllers and the per-tick orchestration.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`controller`]  | `Controller` engine, `ControllerKind`, `Announcement`       |
//! | [`startup`]     | engine-start and pushback dialogue                          |
//! | [`ground`]      | taxi dialogue, hold/resume, path overlay                    |
//! | [`tower`]       | runway clearance from the departure queue                   |
//! | [`approach`]    | arrival-time speed management                               |
//! | [`conflict`]    | closest-aircraft search, speed adjustment, circular waits   |
//! | [`hold`]        | hold-position resolver                                      |
//! | [`reservation`] | per-tick segment reservation passes                         |
//! | [`manager`]     | `AtcManager` (tick loop), `AtcManagerBuilder`               |
//! | [`message`]     | `MessageKind`, `Direction`, `Transmission`                  |
//! | [`observer`]    | `AtcObserver` trait, `NoopObserver`                         |
//! | [`channel`]     | shared-frequency contention state                           |
//! | [`dynamics`]    | `AirportDynamics` (name, frequencies)                       |
//! | [`radio`]       | `UserRadio` (explicit human-response input)                 |
//! | [`error`]       | `ControlError`, `ControlResult<T>`                          |
//!
//! # Tick order
//!
//! [`AtcManager::update`] runs, in order:
//!
//! 1. segment reservations for start-up traffic (pushback precedence),
//! 2. segment reservations for taxiing traffic,
//! 3. per-aircraft updates: start-up, ground, tower, approach,
//! 4. circular-wait flagging on ground traffic,
//! 5. the render hook, then the dead-traffic sweep.

pub mod approach;
pub mod channel;
pub mod conflict;
pub mod controller;
pub mod dynamics;
pub mod error;
pub mod ground;
pub mod hold;
pub mod manager;
pub mod message;
pub mod observer;
pub mod radio;
pub mod reservation;
pub mod startup;
pub mod tower;

#[cfg(test)]
mod tests;

pub use channel::Channel;
pub use controller::{Announcement, Controller, ControllerKind, TickContext};
pub use dynamics::AirportDynamics;
pub use error::{ControlError, ControlResult};
pub use ground::SegmentMark;
pub use manager::{AtcManager, AtcManagerBuilder};
pub use message::{Direction, MessageKind, Transmission};
pub use observer::{AtcObserver, NoopObserver};
pub use radio::UserRadio;
