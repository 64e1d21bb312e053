//! Konno-Ohmachi spectral smoothing.
//!
//! Each output point is a weighted average over the whole spectrum with
//!
//! ```text
//! w(f, fc) = [ sin(b * log10(f / fc)) / (b * log10(f / fc)) ]^4
//! ```
//!
//! and `w = 1` at `f == fc`. The window has constant width on a logarithmic
//! frequency axis; a larger bandwidth coefficient `b` gives a narrower window.
//! Zero-frequency points carry no weight unless the center itself is zero.

use crate::error::AnalysisError;

/// Konno-Ohmachi weights of every frequency in `freqs` around `center`.
///
/// With `normalize`, the weights are divided by their sum.
pub fn konno_ohmachi_window(freqs: &[f64], center: f64, bandwidth: f64, normalize: bool) -> Vec<f64> {
    let mut window: Vec<f64> = if center == 0.0 {
        freqs.iter().map(|&f| if f == 0.0 { 1.0 } else { 0.0 }).collect()
    } else {
        freqs
            .iter()
            .map(|&f| {
                if f == center {
                    1.0
                } else if f == 0.0 {
                    0.0
                } else {
                    let x = bandwidth * (f / center).log10();
                    (x.sin() / x).powi(4)
                }
            })
            .collect()
    };

    if normalize {
        let sum: f64 = window.iter().sum();
        if sum > 0.0 {
            for w in &mut window {
                *w /= sum;
            }
        }
    }
    window
}

/// Smooth `amps` with a normalized Konno-Ohmachi window centred on every
/// frequency, repeated `passes` times.
pub fn konno_ohmachi_smoothing(
    freqs: &[f64],
    amps: &[f64],
    bandwidth: f64,
    passes: usize,
) -> Result<Vec<f64>, AnalysisError> {
    if freqs.len() != amps.len() {
        return Err(AnalysisError::LengthMismatch {
            left: freqs.len(),
            right: amps.len(),
        });
    }
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(AnalysisError::InvalidBandwidth(bandwidth));
    }

    let windows: Vec<Vec<f64>> = freqs
        .iter()
        .map(|&fc| konno_ohmachi_window(freqs, fc, bandwidth, true))
        .collect();

    let mut current = amps.to_vec();
    for _ in 0..passes {
        current = windows
            .iter()
            .map(|w| w.iter().zip(&current).map(|(w, a)| w * a).sum())
            .collect();
    }
    Ok(current)
}

/// Single-pass [`konno_ohmachi_smoothing`].
pub fn smooth_spectrum(freqs: &[f64], amps: &[f64], bandwidth: f64) -> Result<Vec<f64>, AnalysisError> {
    konno_ohmachi_smoothing(freqs, amps, bandwidth, 1)
}
