//! Elastic response spectra of a single-degree-of-freedom oscillator.
//!
//! The oscillator `u'' + 2ζωu' + ω²u = -a(t)` is stepped with the
//! piecewise-exact (Nigam-Jennings) recursion: the ground acceleration is
//! taken as linear between samples, so each step is the closed-form solution
//! of the equation of motion over that interval. Written as a state transition
//!
//! ```text
//! x[k+1] = x_p(dt) + A · (x[k] - x_p(0)),   x = (u, u'),   A = exp(M·dt)
//! ```
//!
//! with `x_p` the particular solution for the linear forcing. The same form
//! covers under-, critically and over-damped oscillators.

use crate::error::AnalysisError;
use crate::spectrum::linspace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sismo_core::Channel;
use std::f64::consts::TAU;
use tracing::debug;

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Tolerance on `|ζ - 1|` below which the oscillator is treated as
/// critically damped.
const CRITICAL_DAMPING_TOLERANCE: f64 = 1e-9;

/// Units the input acceleration is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccelerationUnits {
    /// m/s²
    #[default]
    #[serde(rename = "m/s^2")]
    MetresPerSecondSquared,
    /// cm/s² (gal)
    #[serde(rename = "cm/s^2")]
    CentimetresPerSecondSquared,
    /// Multiples of standard gravity.
    #[serde(rename = "g")]
    G,
}

impl AccelerationUnits {
    /// Factor converting a value in these units to m/s².
    pub fn to_si(self) -> f64 {
        match self {
            AccelerationUnits::MetresPerSecondSquared => 1.0,
            AccelerationUnits::CentimetresPerSecondSquared => 0.01,
            AccelerationUnits::G => STANDARD_GRAVITY,
        }
    }
}

/// Peak oscillator response over a period grid. All quantities are SI
/// (m, m/s, m/s²).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpectrumResult {
    /// Natural periods in seconds.
    pub periods: Vec<f64>,
    /// Damping ratio used for every oscillator.
    pub damping: f64,
    /// Peak relative displacement (Sd).
    pub displacement: Vec<f64>,
    /// Peak relative velocity (Sv).
    pub velocity: Vec<f64>,
    /// Peak absolute acceleration (Sa).
    pub acceleration: Vec<f64>,
    /// ω · Sd.
    pub pseudo_velocity: Vec<f64>,
    /// ω² · Sd.
    pub pseudo_acceleration: Vec<f64>,
}

impl ResponseSpectrumResult {
    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns `true` if the period grid is empty.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Natural frequencies in Hz.
    pub fn frequencies(&self) -> Vec<f64> {
        self.periods.iter().map(|t| 1.0 / t).collect()
    }

    /// Pseudo-spectral acceleration in g.
    pub fn pseudo_acceleration_g(&self) -> Vec<f64> {
        self.pseudo_acceleration
            .iter()
            .map(|a| a / STANDARD_GRAVITY)
            .collect()
    }
}

/// Peak response of one oscillator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OscillatorPeaks {
    /// Peak |u|.
    pub displacement: f64,
    /// Peak |u'|.
    pub velocity: f64,
    /// Peak |u'' + a|.
    pub acceleration: f64,
}

/// Damped linear oscillator with its precomputed step coefficients.
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    omega: f64,
    damping: f64,
    dt: f64,
    /// State transition matrix `exp(M·dt)`, row major.
    a: [[f64; 2]; 2],
}

impl Oscillator {
    /// Oscillator of natural period `period` seconds and damping ratio
    /// `damping`, stepped every `dt` seconds.
    pub fn new(period: f64, damping: f64, dt: f64) -> Result<Self, AnalysisError> {
        if !(period.is_finite() && period > 0.0) {
            return Err(AnalysisError::InvalidPeriod(period));
        }
        if !(damping.is_finite() && damping >= 0.0) {
            return Err(AnalysisError::InvalidDamping(damping));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(AnalysisError::InvalidTimeStep(dt));
        }

        let omega = TAU / period;
        let zw = damping * omega;

        // decay·C and decay·S with decay = exp(-ζω·dt); exp(N·dt) = C·I + S·N
        let (c, s) = if (damping - 1.0).abs() < CRITICAL_DAMPING_TOLERANCE {
            let decay = (-zw * dt).exp();
            (decay, decay * dt)
        } else if damping < 1.0 {
            let q = omega * (1.0 - damping * damping).sqrt();
            let decay = (-zw * dt).exp();
            (decay * (q * dt).cos(), decay * (q * dt).sin() / q)
        } else {
            let q = omega * (damping * damping - 1.0).sqrt();
            let slow = ((q - zw) * dt).exp();
            let fast = (-(q + zw) * dt).exp();
            (0.5 * (slow + fast), 0.5 * (slow - fast) / q)
        };

        let a = [
            [c + s * zw, s],
            [-s * omega * omega, c - s * zw],
        ];
        Ok(Self {
            omega,
            damping,
            dt,
            a,
        })
    }

    /// Angular natural frequency in rad/s.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Peak response to a ground acceleration history (m/s²), starting at rest.
    pub fn peaks(&self, acceleration: &[f64]) -> OscillatorPeaks {
        let w2 = self.omega * self.omega;
        let two_zw = 2.0 * self.damping * self.omega;
        let dt = self.dt;
        let [[a11, a12], [a21, a22]] = self.a;

        let (mut u, mut v) = (0.0_f64, 0.0_f64);
        let mut peaks = OscillatorPeaks::default();
        let mut record = |u: f64, v: f64| {
            peaks.displacement = peaks.displacement.max(u.abs());
            peaks.velocity = peaks.velocity.max(v.abs());
            peaks.acceleration = peaks.acceleration.max((two_zw * v + w2 * u).abs());
        };
        record(u, v);

        for pair in acceleration.windows(2) {
            let alpha = pair[0];
            let beta = (pair[1] - pair[0]) / dt;
            // particular solution of u'' + 2ζωu' + ω²u = -(α + βτ)
            let up0 = -alpha / w2 + two_zw * beta / (w2 * w2);
            let vp = -beta / w2;
            let up1 = up0 + vp * dt;

            let (du, dv) = (u - up0, v - vp);
            u = up1 + a11 * du + a12 * dv;
            v = vp + a21 * du + a22 * dv;
            record(u, v);
        }
        peaks
    }
}

/// Response spectrum of an acceleration history in m/s², sampled every `dt`
/// seconds, over the given periods.
///
/// Periods are evaluated in parallel; each is independent.
pub fn response_spectrum(
    acceleration: &[f64],
    dt: f64,
    periods: &[f64],
    damping: f64,
) -> Result<ResponseSpectrumResult, AnalysisError> {
    if acceleration.is_empty() {
        return Err(AnalysisError::InsufficientSamples { needed: 1, got: 0 });
    }
    let oscillators = periods
        .iter()
        .map(|&t| Oscillator::new(t, damping, dt))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        periods = periods.len(),
        samples = acceleration.len(),
        damping,
        "computing response spectrum"
    );

    let peaks: Vec<(f64, OscillatorPeaks)> = oscillators
        .par_iter()
        .map(|osc| (osc.omega(), osc.peaks(acceleration)))
        .collect();

    let mut result = ResponseSpectrumResult {
        periods: periods.to_vec(),
        damping,
        ..ResponseSpectrumResult::default()
    };
    for (omega, p) in peaks {
        result.displacement.push(p.displacement);
        result.velocity.push(p.velocity);
        result.acceleration.push(p.acceleration);
        result.pseudo_velocity.push(omega * p.displacement);
        result.pseudo_acceleration.push(omega * omega * p.displacement);
    }
    Ok(result)
}

/// [`response_spectrum`] of an unprocessed channel recorded in `units`.
pub fn channel_response_spectrum(
    channel: &Channel,
    periods: &[f64],
    damping: f64,
    units: AccelerationUnits,
) -> Result<ResponseSpectrumResult, AnalysisError> {
    let scale = units.to_si();
    let acceleration: Vec<f64> = channel.samples.iter().map(|a| a * scale).collect();
    response_spectrum(&acceleration, channel.delta(), periods, damping)
}

/// `count` periods evenly spaced from `min` to `max` seconds.
pub fn linspace_periods(min: f64, max: f64, count: usize) -> Result<Vec<f64>, AnalysisError> {
    if !(min.is_finite() && min > 0.0) {
        return Err(AnalysisError::InvalidPeriod(min));
    }
    if !(max.is_finite() && max >= min) {
        return Err(AnalysisError::InvalidPeriod(max));
    }
    if count == 0 {
        return Err(AnalysisError::InsufficientSamples { needed: 1, got: 0 });
    }
    Ok(linspace(min, max, count))
}

/// Peak ground acceleration, velocity and displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundMotionPeaks {
    /// Peak |a| in m/s².
    pub pga: f64,
    /// Peak |v| in m/s.
    pub pgv: f64,
    /// Peak |d| in m.
    pub pgd: f64,
}

/// PGA, and PGV / PGD from trapezoidal integration starting at rest.
pub fn ground_motion_peaks(acceleration: &[f64], dt: f64) -> Result<GroundMotionPeaks, AnalysisError> {
    if acceleration.is_empty() {
        return Err(AnalysisError::InsufficientSamples { needed: 1, got: 0 });
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AnalysisError::InvalidTimeStep(dt));
    }
    let mut peaks = GroundMotionPeaks {
        pga: acceleration[0].abs(),
        ..GroundMotionPeaks::default()
    };
    let (mut v, mut d) = (0.0_f64, 0.0_f64);
    for pair in acceleration.windows(2) {
        let v_next = v + 0.5 * dt * (pair[0] + pair[1]);
        d += 0.5 * dt * (v + v_next);
        v = v_next;
        peaks.pga = peaks.pga.max(pair[1].abs());
        peaks.pgv = peaks.pgv.max(v.abs());
        peaks.pgd = peaks.pgd.max(d.abs());
    }
    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn zero_input_gives_zero_response() {
        let periods = linspace_periods(0.01, 20.0, 50).unwrap();
        for damping in [0.0, 0.05, 1.0, 2.0] {
            let r = response_spectrum(&[0.0; 500], 0.01, &periods, damping).unwrap();
            assert!(r.displacement.iter().all(|&x| x == 0.0));
            assert!(r.velocity.iter().all(|&x| x == 0.0));
            assert!(r.acceleration.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn sudden_step_matches_closed_form() {
        // Constant ground acceleration from rest: peak displacement is
        // a0/ω² · (1 + exp(-πζ/√(1-ζ²))).
        let (period, damping, dt) = (1.0, 0.05, 0.001);
        let omega = TAU / period;
        let expected =
            (1.0 + (-PI * damping / (1.0 - damping * damping).sqrt()).exp()) / (omega * omega);
        let osc = Oscillator::new(period, damping, dt).unwrap();
        let peaks = osc.peaks(&vec![1.0; 10_001]);
        assert!(
            (peaks.displacement - expected).abs() / expected < 1e-3,
            "{} vs {expected}",
            peaks.displacement
        );
    }

    #[test]
    fn rigid_oscillator_follows_ground() {
        // 100 Hz oscillator under a 1 Hz ground motion: Sa ≈ PGA ≈ PSA
        let dt = 0.001;
        let input: Vec<f64> = (0..5001).map(|i| (TAU * i as f64 * dt).sin()).collect();
        let r = response_spectrum(&input, dt, &[0.01], 0.05).unwrap();
        assert!((r.acceleration[0] - 1.0).abs() < 0.01, "Sa {}", r.acceleration[0]);
        assert!((r.pseudo_acceleration[0] - 1.0).abs() < 0.01);
    }

    #[test]
    fn resonance_amplifies() {
        // 1 Hz ground motion on a 1 s oscillator with 5% damping approaches
        // the steady-state amplification 1 / (2ζ) = 10 in displacement terms.
        let dt = 0.005;
        let input: Vec<f64> = (0..12_001).map(|i| (TAU * i as f64 * dt).sin()).collect();
        let r = response_spectrum(&input, dt, &[1.0], 0.05).unwrap();
        let static_disp = 1.0 / (TAU * TAU);
        let ratio = r.displacement[0] / static_disp;
        assert!(ratio > 9.0 && ratio < 10.5, "amplification {ratio}");
    }

    #[test]
    fn pseudo_quantities_follow_displacement() {
        let input: Vec<f64> = (0..2000).map(|i| ((i * 7919) % 13) as f64 - 6.0).collect();
        let r = response_spectrum(&input, 0.01, &[0.1, 0.5, 2.0], 0.05).unwrap();
        for i in 0..3 {
            let w = TAU / r.periods[i];
            assert!((r.pseudo_velocity[i] - w * r.displacement[i]).abs() < 1e-12);
            assert!((r.pseudo_acceleration[i] - w * w * r.displacement[i]).abs() < 1e-9);
        }
        assert!((r.frequencies()[1] - 2.0).abs() < 1e-12);
        assert!(
            (r.pseudo_acceleration_g()[0] - r.pseudo_acceleration[0] / STANDARD_GRAVITY).abs()
                < 1e-15
        );
    }

    #[test]
    fn damping_regimes_agree_near_critical() {
        let input: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.05).sin()).collect();
        let under = Oscillator::new(0.5, 1.0 - 1e-6, 0.01).unwrap().peaks(&input);
        let critical = Oscillator::new(0.5, 1.0, 0.01).unwrap().peaks(&input);
        let over = Oscillator::new(0.5, 1.0 + 1e-6, 0.01).unwrap().peaks(&input);
        for other in [under, over] {
            assert!((other.displacement - critical.displacement).abs() < 1e-4 * critical.displacement);
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            Oscillator::new(0.0, 0.05, 0.01).unwrap_err(),
            AnalysisError::InvalidPeriod(0.0)
        );
        assert_eq!(
            Oscillator::new(1.0, -0.1, 0.01).unwrap_err(),
            AnalysisError::InvalidDamping(-0.1)
        );
        assert_eq!(
            Oscillator::new(1.0, 0.05, 0.0).unwrap_err(),
            AnalysisError::InvalidTimeStep(0.0)
        );
        assert!(response_spectrum(&[], 0.01, &[1.0], 0.05).is_err());
    }

    #[test]
    fn units_convert_to_si() {
        let start = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
        let c = Channel::new("STA", "Z", 100.0, start, vec![0.0, 100.0, 0.0, -100.0, 0.0]);
        let gal = channel_response_spectrum(&c, &[0.5], 0.05, AccelerationUnits::CentimetresPerSecondSquared)
            .unwrap();
        let si = response_spectrum(&[0.0, 1.0, 0.0, -1.0, 0.0], 0.01, &[0.5], 0.05).unwrap();
        assert!((gal.displacement[0] - si.displacement[0]).abs() < 1e-15);
    }

    #[test]
    fn period_grid() {
        let p = linspace_periods(0.01, 20.0, 300).unwrap();
        assert_eq!(p.len(), 300);
        assert_eq!(p[0], 0.01);
        assert_eq!(p[299], 20.0);
        assert!(linspace_periods(0.0, 1.0, 10).is_err());
    }

    #[test]
    fn ground_peaks_of_constant_acceleration() {
        // a = 2 for 1 s: v = 2 m/s, d = 1 m
        let g = ground_motion_peaks(&[2.0; 101], 0.01).unwrap();
        assert_eq!(g.pga, 2.0);
        assert!((g.pgv - 2.0).abs() < 1e-12);
        assert!((g.pgd - 1.0).abs() < 1e-12);
    }
}
