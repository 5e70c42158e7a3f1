//! Explicit input for the user aircraft's radio calls.
//!
//! A pilot call owed by the user aircraft does not go out on its own: the
//! controller *offers* it and waits until the front end reports that the user
//! picked it.  Nothing here reads global state.

use crate::MessageKind;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserRadio {
    selected: bool,
    offered:  Option<MessageKind>,
}

impl UserRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// The call currently waiting for the user, if any.
    pub fn offered(&self) -> Option<MessageKind> {
        self.offered
    }

    /// The user chose to transmit the offered call.
    pub fn select(&mut self) {
        self.selected = true;
    }

    pub(crate) fn offer(&mut self, kind: MessageKind) {
        self.offered = Some(kind);
    }

    /// Consume a pending selection.  Clears the offer when one was taken.
    pub(crate) fn take_selection(&mut self) -> bool {
        if std::mem::take(&mut self.selected) {
            self.offered = None;
            true
        } else {
            false
        }
    }
}
