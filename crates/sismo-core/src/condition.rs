//! Signal conditioning: filter, detrend, trim and taper.
//!
//! Every operation takes its input by reference and returns a new
//! [`Channel`] or [`Waveform`]; nothing is modified in place. The waveform
//! variants apply the channel operation to each channel independently.

use crate::butterworth::{FilterBand, butterworth, filter_zero_phase};
use crate::error::ConditioningError;
use crate::taper::{TaperKind, TaperSide, taper_weights};
use crate::waveform::{Channel, Waveform, seconds_to_duration};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Slack allowed when comparing trim offsets against the duration.
const TIME_TOLERANCE: f64 = 1e-9;

/// How to remove a trend before further processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetrendKind {
    /// Subtract the straight line through the first and last sample.
    #[default]
    Simple,
    /// Subtract the least-squares line.
    Linear,
    /// Subtract the mean.
    #[serde(alias = "demean")]
    Constant,
}

/// Taper shape, edges and half-length in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaperSettings {
    /// Window the taper is cut from.
    #[serde(rename = "type")]
    pub kind: TaperKind,
    /// Edges to taper.
    pub side: TaperSide,
    /// Maximum taper length at each edge, in seconds.
    pub max_length: f64,
}

impl Default for TaperSettings {
    fn default() -> Self {
        Self {
            kind: TaperKind::Parzen,
            side: TaperSide::Both,
            max_length: 1.0,
        }
    }
}

/// Remove a trend from `samples` in place.
pub fn detrend_samples(samples: &mut [f64], kind: DetrendKind) {
    let n = samples.len();
    if n == 0 {
        return;
    }
    match kind {
        DetrendKind::Simple => {
            let first = samples[0];
            let slope = if n > 1 {
                (samples[n - 1] - first) / (n - 1) as f64
            } else {
                0.0
            };
            for (i, x) in samples.iter_mut().enumerate() {
                *x -= first + i as f64 * slope;
            }
        }
        DetrendKind::Linear => {
            let mean_x = (n - 1) as f64 / 2.0;
            let mean_y = samples.iter().sum::<f64>() / n as f64;
            let (mut sxy, mut sxx) = (0.0, 0.0);
            for (i, &y) in samples.iter().enumerate() {
                let dx = i as f64 - mean_x;
                sxy += dx * (y - mean_y);
                sxx += dx * dx;
            }
            let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
            for (i, y) in samples.iter_mut().enumerate() {
                *y -= mean_y + slope * (i as f64 - mean_x);
            }
        }
        DetrendKind::Constant => {
            let mean = samples.iter().sum::<f64>() / n as f64;
            for y in samples.iter_mut() {
                *y -= mean;
            }
        }
    }
}

/// Detrend one channel.
pub fn detrend_channel(channel: &Channel, kind: DetrendKind) -> Result<Channel, ConditioningError> {
    require_samples(channel)?;
    let mut samples = channel.samples.clone();
    detrend_samples(&mut samples, kind);
    Ok(channel.with_samples(samples))
}

/// Detrend every channel of a waveform.
pub fn detrend(waveform: &Waveform, kind: DetrendKind) -> Result<Waveform, ConditioningError> {
    waveform.try_map(|c| detrend_channel(c, kind))
}

/// Zero-phase Butterworth filter of one channel.
///
/// Which corners are present selects the band (both: bandpass, only
/// `freq_min`: highpass, only `freq_max`: lowpass). Corners are first checked
/// against the sanity bounds `freq_min >= 0` and `freq_max <= duration`. A
/// bandpass whose upper corner reaches the Nyquist frequency degrades to a
/// highpass at `freq_min`; any other corner outside `(0, nyquist)` is rejected.
pub fn filter_channel(
    channel: &Channel,
    freq_min: Option<f64>,
    freq_max: Option<f64>,
    corners: usize,
) -> Result<Channel, ConditioningError> {
    require_samples(channel)?;

    let duration = channel.duration();
    let out_of_range = freq_min.is_some_and(|f| f < 0.0)
        || freq_max.is_some_and(|f| f > duration)
        || matches!((freq_min, freq_max), (Some(lo), Some(hi)) if lo >= hi);
    if out_of_range {
        return Err(ConditioningError::InvalidFrequencyRange {
            min: freq_min,
            max: freq_max,
            duration,
        });
    }

    let nyquist = channel.sampling_rate / 2.0;
    let band = match FilterBand::from_corners(freq_min, freq_max)? {
        FilterBand::Bandpass { freq_min, freq_max } if freq_max >= nyquist => {
            warn!(
                component = %channel.component,
                freq_max,
                nyquist,
                "upper corner at or above Nyquist, applying highpass at {freq_min} Hz instead"
            );
            FilterBand::Highpass { freq: freq_min }
        }
        band => band,
    };

    let sections = butterworth(band, corners, channel.sampling_rate)?;
    let mut samples = channel.samples.clone();
    filter_zero_phase(&sections, &mut samples);
    Ok(channel.with_samples(samples))
}

/// Filter every channel of a waveform.
pub fn filter(
    waveform: &Waveform,
    freq_min: Option<f64>,
    freq_max: Option<f64>,
    corners: usize,
) -> Result<Waveform, ConditioningError> {
    waveform.try_map(|c| filter_channel(c, freq_min, freq_max, corners))
}

/// Keep the samples between `left` and `right` seconds after the start,
/// inclusive.
///
/// Fractional boundaries snap to the nearest sample (halves round away from
/// zero): the first kept index is `round(left * rate)` and
/// `round((duration - right) * rate)` samples are dropped from the end. The
/// start time moves forward by the dropped leading samples.
pub fn trim_channel(channel: &Channel, left: f64, right: f64) -> Result<Channel, ConditioningError> {
    require_samples(channel)?;
    let duration = channel.duration();
    let invalid = ConditioningError::InvalidTrimRange {
        left,
        right,
        duration,
    };
    if !(left >= 0.0 && right <= duration + TIME_TOLERANCE && left <= right) {
        return Err(invalid);
    }

    let rate = channel.sampling_rate;
    let npts = channel.npts();
    let first = (left * rate).round() as usize;
    let dropped = ((duration - right) * rate).round() as usize;
    let Some(last) = (npts - 1).checked_sub(dropped) else {
        return Err(invalid);
    };
    if first > last {
        return Err(invalid);
    }

    let mut trimmed = channel.with_samples(channel.samples[first..=last].to_vec());
    trimmed.start_time = channel.start_time + seconds_to_duration(first as f64 / rate);
    Ok(trimmed)
}

/// Trim every channel of a waveform.
pub fn trim(waveform: &Waveform, left: f64, right: f64) -> Result<Waveform, ConditioningError> {
    waveform.try_map(|c| trim_channel(c, left, right))
}

/// Taper the edges of one channel.
///
/// The half-length is `max_length * rate` samples (truncated), capped at half
/// the trace.
pub fn taper_channel(
    channel: &Channel,
    settings: &TaperSettings,
) -> Result<Channel, ConditioningError> {
    require_samples(channel)?;
    if !(settings.max_length.is_finite() && settings.max_length >= 0.0) {
        return Err(ConditioningError::InvalidTaperLength(settings.max_length));
    }
    let wlen = (settings.max_length * channel.sampling_rate) as usize;
    let weights = taper_weights(settings.kind, settings.side, channel.npts(), wlen);
    let samples = channel
        .samples
        .iter()
        .zip(&weights)
        .map(|(x, w)| x * w)
        .collect();
    Ok(channel.with_samples(samples))
}

/// Taper every channel of a waveform.
pub fn taper(waveform: &Waveform, settings: &TaperSettings) -> Result<Waveform, ConditioningError> {
    waveform.try_map(|c| taper_channel(c, settings))
}

fn require_samples(channel: &Channel) -> Result<(), ConditioningError> {
    if channel.samples.is_empty() {
        return Err(ConditioningError::EmptyInput(channel.component.clone()));
    }
    Ok(())
}
