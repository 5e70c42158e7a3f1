//! CSV transcript backend.
//!
//! Creates `transmissions.csv` in the configured output directory.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TranscriptWriter;
use crate::{OutputResult, TransmissionRow};

/// Writes every transmission as one CSV row.
pub struct CsvTranscript {
    out:      Writer<File>,
    finished: bool,
}

impl CsvTranscript {
    /// Open (or create) `transmissions.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut out = Writer::from_path(dir.join("transmissions.csv"))?;
        out.write_record(["time", "sender", "receiver", "kind", "direction", "audible", "frequency"])?;
        Ok(Self { out, finished: false })
    }
}

impl TranscriptWriter for CsvTranscript {
    fn write_transmission(&mut self, row: &TransmissionRow) -> OutputResult<()> {
        self.out.write_record(&[
            row.time_secs.to_string(),
            row.sender.clone(),
            row.receiver.clone(),
            row.kind.to_string(),
            row.direction.to_string(),
            (row.audible as u8).to_string(),
            row.frequency.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
