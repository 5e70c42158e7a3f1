//! The `TranscriptWriter` trait implemented by all backend writers.

use crate::{OutputResult, TransmissionRow};

/// Trait implemented by transcript backends.
///
/// Errors are stored by the observer and retrieved with
/// [`TranscriptObserver::take_error`](crate::TranscriptObserver::take_error).
pub trait TranscriptWriter {
    /// Append one transmission.
    fn write_transmission(&mut self, row: &TransmissionRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
