//! Output hooks invoked by [`AtcManager`](crate::AtcManager).

use atc_core::{AircraftId, SimTime};

use crate::{ControllerKind, Transmission};

/// Callbacks for everything the core produces but does not consume.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  None of them can feed back into the
/// simulation.
///
/// # Example: dialog printer
///
/// ```rust,ignore
/// struct Dialog;
///
/// impl AtcObserver for Dialog {
///     fn on_transmission(&mut self, tx: &Transmission) {
///         println!("{} -> {}: {}", tx.sender, tx.receiver, tx.kind);
///     }
/// }
/// ```
pub trait AtcObserver {
    /// A controller or pilot keyed the microphone.
    fn on_transmission(&mut self, _tx: &Transmission) {}

    /// Show (`true`) or remove (`false`) the path overlay of `controller`.
    /// The overlay itself is pulled via
    /// [`AtcManager::path_overlay`](crate::AtcManager::path_overlay).
    fn render(&mut self, _controller: ControllerKind, _visible: bool) {}

    /// A waits-for cycle through `aircraft` was detected.
    fn on_circular_wait(&mut self, _aircraft: AircraftId, _now: SimTime) {}

    /// Called once at the end of every [`AtcManager::update`](crate::AtcManager::update).
    fn on_tick_end(&mut self, _now: SimTime) {}
}

/// An [`AtcObserver`] that does nothing.
pub struct NoopObserver;

impl AtcObserver for NoopObserver {}
