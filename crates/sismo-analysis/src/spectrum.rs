//! Fourier amplitude spectra, log-spaced resampling and signal-to-noise masking.
//!
//! The amplitude spectrum is scaled by the sampling interval, so a sinusoid of
//! amplitude `A` spanning `N` samples peaks at roughly `A * N / 2 * delta`.

use crate::error::AnalysisError;
use crate::fft::Fft;
use crate::konno_ohmachi::konno_ohmachi_smoothing;
use serde::{Deserialize, Serialize};
use sismo_core::Channel;

/// Frequencies and amplitudes of a spectrum, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FourierSpectrum {
    /// Frequencies in Hz, ascending.
    pub freqs: Vec<f64>,
    /// Amplitude at each frequency.
    pub amps: Vec<f64>,
}

impl FourierSpectrum {
    /// Number of spectral points.
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    /// Returns `true` if the spectrum has no points.
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// Log-spaced frequency grid the spectra are resampled onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyGrid {
    /// Lowest frequency in Hz.
    pub min_freq: f64,
    /// Highest frequency in Hz.
    pub max_freq: f64,
    /// Number of grid points.
    pub points: usize,
}

impl Default for FrequencyGrid {
    fn default() -> Self {
        Self {
            min_freq: 0.2,
            max_freq: 30.0,
            points: 30,
        }
    }
}

impl FrequencyGrid {
    /// The grid frequencies.
    pub fn frequencies(&self) -> Result<Vec<f64>, AnalysisError> {
        log_space(self.min_freq, self.max_freq, self.points)
    }
}

/// Per-channel spectra of one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumResult {
    /// Component label of the source channel.
    pub component: String,
    /// Full-resolution amplitude spectrum.
    pub raw: FourierSpectrum,
    /// `raw` resampled onto the log grid.
    pub interpolated: FourierSpectrum,
    /// `interpolated` after Konno-Ohmachi smoothing.
    pub smoothed: FourierSpectrum,
}

/// Amplitude spectrum of a real trace.
///
/// Takes the first `npts / 2` DFT bins, scales their magnitude by
/// `1 / sampling_rate` and pairs them with `npts / 2` frequencies spaced
/// evenly from 0 to Nyquist inclusive.
pub fn fourier_amplitude_spectrum(
    samples: &[f64],
    sampling_rate: f64,
) -> Result<FourierSpectrum, AnalysisError> {
    let npts = samples.len();
    if npts < 2 {
        return Err(AnalysisError::InsufficientSamples { needed: 2, got: npts });
    }
    if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
        return Err(AnalysisError::InvalidTimeStep(1.0 / sampling_rate));
    }
    let delta = 1.0 / sampling_rate;
    let half = npts / 2;

    let spectrum = Fft::new(npts).forward(samples);
    let amps = spectrum[..half].iter().map(|c| delta * c.norm()).collect();
    let freqs = linspace(0.0, sampling_rate / 2.0, half);
    Ok(FourierSpectrum { freqs, amps })
}

/// [`fourier_amplitude_spectrum`] of a channel.
pub fn channel_spectrum(channel: &Channel) -> Result<FourierSpectrum, AnalysisError> {
    fourier_amplitude_spectrum(&channel.samples, channel.sampling_rate)
}

/// `points` frequencies log-spaced from `min` to `max` inclusive.
pub fn log_space(min: f64, max: f64, points: usize) -> Result<Vec<f64>, AnalysisError> {
    let valid = min.is_finite() && max.is_finite() && min > 0.0 && max > min && points > 0;
    if !valid {
        return Err(AnalysisError::InvalidFrequencyGrid { min, max, points });
    }
    let (lo, hi) = (min.log10(), max.log10());
    Ok(linspace(lo, hi, points)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect())
}

/// Resample a spectrum onto a log-spaced grid by linear interpolation of
/// `log10(amp)` against `log10(freq)`.
///
/// Non-positive frequencies (the DC bin) are ignored. Grid points outside the
/// data take the nearest end value.
pub fn interpolate_log_spectrum(
    freqs: &[f64],
    amps: &[f64],
    min_freq: f64,
    max_freq: f64,
    points: usize,
) -> Result<FourierSpectrum, AnalysisError> {
    let grid = log_space(min_freq, max_freq, points)?;
    let amps = interpolate_log_log(freqs, amps, &grid)?;
    Ok(FourierSpectrum { freqs: grid, amps })
}

/// Log-log interpolation of `(freqs, amps)` at arbitrary positive frequencies.
pub fn interpolate_log_log(
    freqs: &[f64],
    amps: &[f64],
    at: &[f64],
) -> Result<Vec<f64>, AnalysisError> {
    if freqs.len() != amps.len() {
        return Err(AnalysisError::LengthMismatch {
            left: freqs.len(),
            right: amps.len(),
        });
    }
    let (xp, fp): (Vec<f64>, Vec<f64>) = freqs
        .iter()
        .zip(amps)
        .filter(|&(&f, _)| f > 0.0)
        .map(|(&f, &a)| (f.log10(), a.log10()))
        .unzip();
    if xp.is_empty() {
        return Err(AnalysisError::InsufficientSamples { needed: 1, got: 0 });
    }

    let last = xp.len() - 1;
    let values = at
        .iter()
        .map(|&f| {
            let x = f.log10();
            let y = if x <= xp[0] {
                fp[0]
            } else if x >= xp[last] {
                fp[last]
            } else {
                let j = xp.partition_point(|&v| v <= x) - 1;
                let t = (x - xp[j]) / (xp[j + 1] - xp[j]);
                if t == 0.0 {
                    fp[j]
                } else if fp[j].is_infinite() || fp[j + 1].is_infinite() {
                    // a zero amplitude pulls the whole segment to zero
                    f64::NEG_INFINITY
                } else {
                    fp[j] + (fp[j + 1] - fp[j]) * t
                }
            };
            10f64.powf(y)
        })
        .collect();
    Ok(values)
}

/// Keep signal amplitudes whose signal-to-noise ratio exceeds `threshold`.
///
/// Every other point becomes `None`, including points where the ratio is
/// undefined (e.g. `0 / 0`).
pub fn apply_signal_to_noise_ratio(
    noise: &[f64],
    signal: &[f64],
    threshold: f64,
) -> Result<Vec<Option<f64>>, AnalysisError> {
    if noise.len() != signal.len() {
        return Err(AnalysisError::LengthMismatch {
            left: noise.len(),
            right: signal.len(),
        });
    }
    Ok(noise
        .iter()
        .zip(signal)
        .map(|(&n, &s)| (s / n > threshold).then_some(s))
        .collect())
}

/// Raw, interpolated and smoothed spectra of one conditioned window channel.
pub fn analyze_window(
    channel: &Channel,
    grid: &FrequencyGrid,
    bandwidth: f64,
    passes: usize,
) -> Result<SpectrumResult, AnalysisError> {
    let raw = channel_spectrum(channel)?;
    let interpolated =
        interpolate_log_spectrum(&raw.freqs, &raw.amps, grid.min_freq, grid.max_freq, grid.points)?;
    let smoothed_amps =
        konno_ohmachi_smoothing(&interpolated.freqs, &interpolated.amps, bandwidth, passes)?;
    let smoothed = FourierSpectrum {
        freqs: interpolated.freqs.clone(),
        amps: smoothed_amps,
    };
    Ok(SpectrumResult {
        component: channel.component.clone(),
        raw,
        interpolated,
        smoothed,
    })
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub(crate) fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}
