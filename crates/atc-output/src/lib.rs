//! `atc-output` — radio transcript writers.
//!
//! | Writer            | Files created        |
//! |-------------------|----------------------|
//! | [`CsvTranscript`] | `transmissions.csv`  |
//!
//! Writers implement [`TranscriptWriter`] and are driven by
//! [`TranscriptObserver`], which implements `atc_control::AtcObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use atc_output::{CsvTranscript, TranscriptObserver};
//!
//! let writer = CsvTranscript::new(Path::new("./output"))?;
//! let mut obs = TranscriptObserver::new(writer);
//! for _ in 0..3600 {
//!     atc.update(1.0, &mut radio, &mut obs);
//! }
//! obs.finish();
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvTranscript;
pub use error::{OutputError, OutputResult};
pub use observer::TranscriptObserver;
pub use row::TransmissionRow;
pub use writer::TranscriptWriter;
