//! Per-record processing driver.
//!
//! [`process_record`] runs one record from text file to figures. It is a pure
//! function of its inputs: figures are buffered and handed back only when
//! every stage succeeded, so a failing record never reaches the sink.

use sismo_analysis::{AnalysisError, analyze_window, apply_signal_to_noise_ratio, channel_response_spectrum};
use sismo_config::{FilterSettings, PipelineConfig};
use sismo_core::{
    ArrivalLookup, ConditioningError, RecordId, ValidationError, condition_window, derive_windows,
    detrend, filter, validate_arrivals, validate_waveform,
};
use sismo_io::{Figure, FigureSink, export_spectra_csv, read_record};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Why a record was skipped.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The text record could not be read or parsed.
    #[error("ingestion failed: {0}")]
    Ingestion(#[from] sismo_io::Error),

    /// The waveform or its arrivals failed a check.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Filtering, detrending, trimming or tapering failed.
    #[error("conditioning failed: {0}")]
    Conditioning(#[from] ConditioningError),

    /// No arrival picks are known for the record.
    #[error("no arrivals for record '{0}'")]
    Lookup(RecordId),

    /// Spectral or response analysis failed.
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Figures or spectra could not be written.
    #[error("output failed: {0}")]
    Output(sismo_io::Error),
}

impl RecordError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            RecordError::Ingestion(_) => "ingestion",
            RecordError::Validation(_) => "validation",
            RecordError::Conditioning(_) => "conditioning",
            RecordError::Lookup(_) => "arrival lookup",
            RecordError::Analysis(_) => "analysis",
            RecordError::Output(_) => "output",
        }
    }
}

/// Figures of one fully processed record.
#[derive(Debug)]
pub struct ProcessedRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Every figure, in stage order, spectra last.
    pub figures: Vec<Figure>,
}

impl ProcessedRecord {
    /// Number of per-component spectra figures.
    pub fn spectra_count(&self) -> usize {
        self.figures
            .iter()
            .filter(|f| matches!(f, Figure::Spectra { .. }))
            .count()
    }

    /// Write one spectra CSV per component into `output_dir`, then send every
    /// figure to `sink`.
    ///
    /// The CSVs go first: if any of them cannot be written, the ones already
    /// written are removed and the sink receives nothing.
    pub fn emit<S: FigureSink + ?Sized>(&self, sink: &mut S, output_dir: &Path) -> Result<(), RecordError> {
        let mut written: Vec<PathBuf> = Vec::new();
        for figure in &self.figures {
            let Figure::Spectra {
                record,
                component,
                noise,
                signal,
                masked,
                ..
            } = figure
            else {
                continue;
            };
            let path = output_dir.join(format!("{record}_{component}.csv"));
            if let Err(err) = export_spectra_csv(&path, noise, signal, masked) {
                written.push(path);
                for stale in &written {
                    if stale.is_file() && std::fs::remove_file(stale).is_err() {
                        warn!(file = %stale.display(), "cannot remove partial spectra CSV");
                    }
                }
                return Err(RecordError::Output(err));
            }
            written.push(path);
        }

        for figure in &self.figures {
            sink.accept(figure).map_err(RecordError::Output)?;
        }
        sink.flush().map_err(RecordError::Output)
    }
}

fn band_label(filter: &FilterSettings) -> String {
    match (filter.freq_min, filter.freq_max) {
        (Some(lo), Some(hi)) => format!("{lo}-{hi} Hz"),
        (Some(lo), None) => format!(">{lo} Hz"),
        (None, Some(hi)) => format!("<{hi} Hz"),
        (None, None) => "unfiltered".to_string(),
    }
}

/// Run the whole pipeline on one record file.
///
/// `periods` is the oscillator grid for the response spectrum, computed once
/// per batch from the configuration.
pub fn process_record<A: ArrivalLookup + ?Sized>(
    path: &Path,
    config: &PipelineConfig,
    periods: &[f64],
    arrivals: &A,
) -> Result<ProcessedRecord, RecordError> {
    let raw = read_record(path)?;
    validate_waveform(&raw)?;
    let id = raw.record_id().ok_or(ValidationError::EmptyWaveform)?;
    debug!(record = %id, file = %path.display(), "record validated");

    let mut figures = vec![Figure::waveform(
        format!("Initial records - {id}"),
        &id,
        &raw,
        None,
    )];

    let settings = &config.filter;
    let band = band_label(settings);
    let filtered = filter(&raw, settings.freq_min, settings.freq_max, settings.corners)?;
    figures.push(Figure::waveform(
        format!("Filtered records ({band}) - {id}"),
        &id,
        &filtered,
        None,
    ));

    let broadband = detrend(&filtered, config.detrend)?;
    figures.push(Figure::waveform(
        format!("Filtered ({band}) & detrended ({:?}) - {id}", config.detrend),
        &id,
        &broadband,
        None,
    ));

    let picks = arrivals
        .lookup(&id)
        .ok_or_else(|| RecordError::Lookup(id.clone()))?;
    let times = validate_arrivals(&broadband, &picks, config.window_length)?;
    figures.push(Figure::waveform(
        format!("Arrivals selection P={} & S={}", times.p, times.s),
        &id,
        &broadband,
        Some(times),
    ));

    let (noise, signal) = derive_windows(&broadband, &times, config.window_length)?;
    figures.push(Figure::waveform("Trimmed noise", &id, &noise, Some(times)));
    figures.push(Figure::waveform("Trimmed signal", &id, &signal, Some(times)));

    let noise = condition_window(&noise, config.detrend, &config.taper)?;
    let signal = condition_window(&signal, config.detrend, &config.taper)?;
    figures.push(Figure::waveform(
        "Trimmed, detrended and tapered noise",
        &id,
        &noise,
        None,
    ));
    figures.push(Figure::waveform(
        "Trimmed, detrended and tapered signal",
        &id,
        &signal,
        None,
    ));

    let spectrum = &config.spectrum;
    let response = &config.response;
    for ((noise_channel, signal_channel), raw_channel) in noise.iter().zip(&signal).zip(&raw) {
        let noise_spectra = analyze_window(
            noise_channel,
            &spectrum.grid,
            spectrum.konno_ohmachi_bandwidth,
            spectrum.smoothing_passes,
        )?;
        let signal_spectra = analyze_window(
            signal_channel,
            &spectrum.grid,
            spectrum.konno_ohmachi_bandwidth,
            spectrum.smoothing_passes,
        )?;
        let masked = apply_signal_to_noise_ratio(
            &noise_spectra.smoothed.amps,
            &signal_spectra.smoothed.amps,
            spectrum.signal_to_noise,
        )?;
        let response_spectrum =
            channel_response_spectrum(raw_channel, periods, response.damping, response.units)?;

        debug!(
            record = %id,
            component = %signal_channel.component,
            kept = masked.iter().filter(|m| m.is_some()).count(),
            "spectra computed"
        );
        figures.push(Figure::Spectra {
            record: id.clone(),
            component: signal_channel.component.clone(),
            noise: noise_spectra,
            signal: signal_spectra,
            masked,
            response: response_spectrum,
        });
    }

    Ok(ProcessedRecord { id, figures })
}
