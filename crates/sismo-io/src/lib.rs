//! Input and output for the sismo pipeline.
//!
//! This crate provides:
//!
//! - **Record ingestion**: [`read_record`] and [`parse_record`] turn the
//!   fixed-format text export of a strong-motion station into a [`Waveform`](sismo_core::Waveform)
//! - **Figure sinks**: the [`FigureSink`] trait with [`JsonLinesSink`] and
//!   [`MemorySink`] implementations, receiving plot-ready [`Figure`]s
//! - **Export**: [`export_spectra_csv`] for the smoothed noise / signal spectra
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sismo_io::{read_record, Figure, FigureSink, JsonLinesSink};
//!
//! let waveform = read_record("data/VSK1.txt")?;
//! let mut sink = JsonLinesSink::create("figures.jsonl")?;
//! sink.accept(&Figure::waveform("Initial records", id, &waveform, None))?;
//! ```

mod export;
mod record;
mod sink;

pub use export::{export_spectra_csv, write_spectra_csv};
pub use record::{RecordHeader, parse_record, parse_timestamp, read_record};
pub use sink::{Figure, FigureSink, JsonLinesSink, MemorySink};

/// Error types for record ingestion and output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record ends before a required header line.
    #[error("line {line}: missing {field} header")]
    MissingLine {
        /// 1-based line number.
        line: usize,
        /// Header field expected on that line.
        field: &'static str,
    },

    /// A header line could not be interpreted.
    #[error("line {line}: invalid {field} '{value}'")]
    MalformedHeader {
        /// 1-based line number.
        line: usize,
        /// Header field on that line.
        field: &'static str,
        /// Offending text.
        value: String,
    },

    /// A sample row has the wrong shape or a non-numeric cell.
    #[error("line {line}: {reason}")]
    MalformedRow {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for ingestion and output.
pub type Result<T> = std::result::Result<T, Error>;
