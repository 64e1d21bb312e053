//! Figure sinks: where plot-ready data goes.
//!
//! The pipeline never draws anything itself. Each stage hands a [`Figure`] to
//! a [`FigureSink`]; the sink decides whether to store, serialize or render it.

use crate::Result;
use serde::{Deserialize, Serialize};
use sismo_analysis::{ResponseSpectrumResult, SpectrumResult};
use sismo_core::{ArrivalTimes, RecordId, Waveform};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plot-ready data for one figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    /// Time series of every channel at some processing stage.
    Waveform {
        /// Figure title, naming the stage.
        title: String,
        /// Record the data belongs to.
        record: RecordId,
        /// Channels to draw.
        waveform: Waveform,
        /// Arrival markers, when known.
        arrivals: Option<ArrivalTimes>,
    },
    /// Noise and signal spectra of one component with its response spectrum.
    Spectra {
        /// Record the data belongs to.
        record: RecordId,
        /// Component label.
        component: String,
        /// Spectra of the noise window.
        noise: SpectrumResult,
        /// Spectra of the signal window.
        signal: SpectrumResult,
        /// Smoothed signal amplitudes that clear the signal-to-noise
        /// threshold; `None` points are not drawn.
        masked: Vec<Option<f64>>,
        /// Response spectrum of the unprocessed channel.
        response: ResponseSpectrumResult,
    },
}

impl Figure {
    /// Waveform figure from borrowed data.
    pub fn waveform(
        title: impl Into<String>,
        record: &RecordId,
        waveform: &Waveform,
        arrivals: Option<ArrivalTimes>,
    ) -> Self {
        Figure::Waveform {
            title: title.into(),
            record: record.clone(),
            waveform: waveform.clone(),
            arrivals,
        }
    }

    /// Record this figure belongs to.
    pub fn record(&self) -> &RecordId {
        match self {
            Figure::Waveform { record, .. } | Figure::Spectra { record, .. } => record,
        }
    }
}

/// Anything that accepts figures.
pub trait FigureSink {
    /// Take one figure.
    fn accept(&mut self, figure: &Figure) -> Result<()>;

    /// Push buffered output to its destination.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: FigureSink + ?Sized> FigureSink for Box<S> {
    fn accept(&mut self, figure: &Figure) -> Result<()> {
        (**self).accept(figure)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Writes each figure as one JSON document per line.
///
/// Non-finite numbers and masked points are written as `null`.
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl JsonLinesSink<File> {
    /// Create (or truncate) a JSON-lines file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Number of figures written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

impl<W: Write> FigureSink for JsonLinesSink<W> {
    fn accept(&mut self, figure: &Figure) -> Result<()> {
        serde_json::to_writer(&mut self.writer, figure)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every figure in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Figures in arrival order.
    pub figures: Vec<Figure>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Figures belonging to one record.
    pub fn for_record<'a>(&'a self, record: &'a RecordId) -> impl Iterator<Item = &'a Figure> + 'a {
        self.figures.iter().filter(move |f| f.record() == record)
    }
}

impl FigureSink for MemorySink {
    fn accept(&mut self, figure: &Figure) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}
