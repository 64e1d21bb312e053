//! Butterworth IIR design as cascaded second-order sections.
//!
//! The design follows the classic route used by geophysical processing
//! packages: analog Butterworth prototype, frequency transformation
//! (lowpass / highpass / bandpass) on prewarped corners, bilinear transform,
//! then grouping of conjugate poles into biquads. A bandpass of `corners`
//! order therefore has `2 * corners` poles.
//!
//! [`filter_zero_phase`] runs the cascade forward and then backward over the
//! reversed output, which squares the magnitude response and cancels the phase.

use crate::biquad::Biquad;
use crate::error::ConditioningError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Bilinear transform constant for a design normalized to a sampling rate of 2.
const FS2: f64 = 4.0;

/// Imaginary parts below this are treated as real poles.
const REAL_POLE_TOLERANCE: f64 = 1e-12;

/// Pass band of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterBand {
    /// Attenuate above `freq` Hz.
    Lowpass {
        /// Corner in Hz.
        freq: f64,
    },
    /// Attenuate below `freq` Hz.
    Highpass {
        /// Corner in Hz.
        freq: f64,
    },
    /// Keep `freq_min..freq_max` Hz.
    Bandpass {
        /// Lower corner in Hz.
        freq_min: f64,
        /// Upper corner in Hz.
        freq_max: f64,
    },
}

impl FilterBand {
    /// Pick the band from whichever corners are present: both gives a
    /// bandpass, only the minimum a highpass, only the maximum a lowpass.
    pub fn from_corners(
        freq_min: Option<f64>,
        freq_max: Option<f64>,
    ) -> Result<Self, ConditioningError> {
        match (freq_min, freq_max) {
            (Some(freq_min), Some(freq_max)) => Ok(Self::Bandpass { freq_min, freq_max }),
            (Some(freq), None) => Ok(Self::Highpass { freq }),
            (None, Some(freq)) => Ok(Self::Lowpass { freq }),
            (None, None) => Err(ConditioningError::MissingCorner),
        }
    }

    /// Lower corner, if the band has one.
    pub fn freq_min(&self) -> Option<f64> {
        match *self {
            Self::Highpass { freq } => Some(freq),
            Self::Bandpass { freq_min, .. } => Some(freq_min),
            Self::Lowpass { .. } => None,
        }
    }

    /// Upper corner, if the band has one.
    pub fn freq_max(&self) -> Option<f64> {
        match *self {
            Self::Lowpass { freq } => Some(freq),
            Self::Bandpass { freq_max, .. } => Some(freq_max),
            Self::Highpass { .. } => None,
        }
    }
}

/// Design a Butterworth filter of the given order as a biquad cascade.
///
/// Every corner must lie strictly between 0 and the Nyquist frequency.
pub fn butterworth(
    band: FilterBand,
    corners: usize,
    sampling_rate: f64,
) -> Result<Vec<Biquad>, ConditioningError> {
    if corners == 0 {
        return Err(ConditioningError::InvalidCornerOrder(corners));
    }
    let nyquist = sampling_rate / 2.0;
    let warp = |freq: f64| -> Result<f64, ConditioningError> {
        if !(freq > 0.0 && freq < nyquist) {
            return Err(ConditioningError::DegenerateCorner { freq, nyquist });
        }
        Ok(FS2 * (PI * freq / nyquist / 2.0).tan())
    };

    let prototype = prototype_poles(corners);
    let n = corners as i32;

    // Analog poles, number of analog zeros at the origin, and analog gain.
    let (poles, origin_zeros, gain): (Vec<Complex64>, usize, f64) = match band {
        FilterBand::Lowpass { freq } => {
            let wo = warp(freq)?;
            let poles = prototype.iter().map(|p| *p * wo).collect();
            (poles, 0, wo.powi(n))
        }
        FilterBand::Highpass { freq } => {
            let wo = warp(freq)?;
            let poles = prototype.iter().map(|p| wo / *p).collect();
            let prod: Complex64 = prototype.iter().map(|p| -*p).product();
            (poles, corners, (Complex64::new(1.0, 0.0) / prod).re)
        }
        FilterBand::Bandpass { freq_min, freq_max } => {
            let w1 = warp(freq_min)?;
            let w2 = warp(freq_max)?;
            let bw = w2 - w1;
            let wo2 = w1 * w2;
            let mut poles = Vec::with_capacity(2 * corners);
            for p in &prototype {
                let p_lp = *p * (bw / 2.0);
                let root = (p_lp * p_lp - wo2).sqrt();
                poles.push(p_lp + root);
                poles.push(p_lp - root);
            }
            (poles, corners, bw.powi(n))
        }
    };

    // Bilinear transform.
    let denominator: Complex64 = poles.iter().map(|p| FS2 - *p).product();
    let numerator = FS2.powi(origin_zeros as i32);
    let digital_gain = gain * (Complex64::new(numerator, 0.0) / denominator).re;
    let digital_poles: Vec<Complex64> = poles.iter().map(|p| (FS2 + *p) / (FS2 - *p)).collect();

    // Analog zeros at the origin map to z = 1, zeros at infinity to z = -1.
    // Interleaving keeps one of each per bandpass section.
    let infinite_zeros = digital_poles.len() - origin_zeros;
    let mut zeros = Vec::with_capacity(digital_poles.len());
    for i in 0..origin_zeros.max(infinite_zeros) {
        if i < origin_zeros {
            zeros.push(1.0);
        }
        if i < infinite_zeros {
            zeros.push(-1.0);
        }
    }

    let mut sections = into_sections(&digital_poles, &zeros);
    if let Some(first) = sections.first_mut() {
        first.scale(digital_gain);
    }
    Ok(sections)
}

/// Poles of the normalized analog Butterworth prototype.
fn prototype_poles(order: usize) -> Vec<Complex64> {
    let n = order as i32;
    (0..n)
        .map(|k| {
            let m = f64::from(2 * k - n + 1);
            -Complex64::from_polar(1.0, PI * m / f64::from(2 * n))
        })
        .collect()
}

/// Group conjugate pole pairs (and leftover real poles) into biquads, taking
/// zeros from the front of `zeros` as needed.
fn into_sections(poles: &[Complex64], zeros: &[f64]) -> Vec<Biquad> {
    let mut complex = Vec::new();
    let mut real = Vec::new();
    for p in poles {
        if p.im.abs() <= REAL_POLE_TOLERANCE {
            real.push(p.re);
        } else if p.im > 0.0 {
            complex.push(*p);
        }
    }

    fn take_pair(zeros: &mut impl Iterator<Item = f64>) -> [f64; 3] {
        let z1 = zeros.next().unwrap_or(0.0);
        let z2 = zeros.next().unwrap_or(0.0);
        [1.0, -(z1 + z2), z1 * z2]
    }

    let mut zeros = zeros.iter().copied();

    let mut sections = Vec::with_capacity(complex.len() + real.len().div_ceil(2));
    for p in complex {
        let b = take_pair(&mut zeros);
        sections.push(Biquad::from_coefficients(b, [1.0, -2.0 * p.re, p.norm_sqr()]));
    }
    for pair in real.chunks(2) {
        if let &[p1, p2] = pair {
            let b = take_pair(&mut zeros);
            sections.push(Biquad::from_coefficients(b, [1.0, -(p1 + p2), p1 * p2]));
        } else {
            let z = zeros.next().unwrap_or(0.0);
            sections.push(Biquad::from_coefficients([1.0, -z, 0.0], [1.0, -pair[0], 0.0]));
        }
    }
    sections
}

/// Run a biquad cascade over `samples` from a cleared state.
pub fn filter_causal(sections: &[Biquad], samples: &mut [f64]) {
    for section in sections {
        let mut section = section.clone();
        section.clear();
        section.process_block(samples);
    }
}

/// Forward-backward filtering: no phase shift, squared magnitude response.
pub fn filter_zero_phase(sections: &[Biquad], samples: &mut [f64]) {
    filter_causal(sections, samples);
    samples.reverse();
    filter_causal(sections, samples);
    samples.reverse();
}

/// Magnitude of the cascade's single-pass frequency response at `freq` Hz.
pub fn magnitude_response(sections: &[Biquad], freq: f64, sampling_rate: f64) -> f64 {
    let omega = 2.0 * PI * freq / sampling_rate;
    let z_inv = Complex64::from_polar(1.0, -omega);
    sections
        .iter()
        .map(|s| {
            let (b, a) = s.coefficients();
            let num = b[0] + z_inv * (b[1] + z_inv * b[2]);
            let den = a[0] + z_inv * (a[1] + z_inv * a[2]);
            (num / den).norm()
        })
        .product()
}
