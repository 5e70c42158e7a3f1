//! `TranscriptObserver<W>` — bridges `AtcObserver` to a `TranscriptWriter`.

use atc_control::{AtcObserver, Transmission};

use crate::writer::TranscriptWriter;
use crate::{OutputError, OutputResult, TransmissionRow};

/// An [`AtcObserver`] that writes every transmission to a
/// [`TranscriptWriter`].
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Check with [`take_error`][Self::take_error] once
/// the run is over.
pub struct TranscriptObserver<W: TranscriptWriter> {
    writer:     W,
    written:    u64,
    last_error: Option<OutputError>,
}

impl<W: TranscriptWriter> TranscriptObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Rows written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush the writer.  Call once after the last tick.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TranscriptWriter> AtcObserver for TranscriptObserver<W> {
    fn on_transmission(&mut self, tx: &Transmission) {
        let result = self.writer.write_transmission(&TransmissionRow::from(tx));
        if result.is_ok() {
            self.written += 1;
        }
        self.store_err(result);
    }
}
