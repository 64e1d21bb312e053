//! Noise and signal windows around the P and S arrivals.

use crate::arrivals::ArrivalTimes;
use crate::condition::{DetrendKind, TaperSettings, detrend, taper, trim};
use crate::error::ConditioningError;
use crate::waveform::Waveform;

/// Which part of the record a window covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Pre-event noise ending just after the P arrival.
    Noise,
    /// Shaking starting just before the S arrival.
    Signal,
}

impl WindowKind {
    /// Offsets `(left, right)` in seconds from the record start.
    ///
    /// Noise spans `[P - window_length - 1, P + 1]`, signal spans
    /// `[S - 1, S + window_length + 1]`.
    pub fn bounds(self, arrivals: &ArrivalTimes, window_length: f64) -> (f64, f64) {
        match self {
            WindowKind::Noise => (arrivals.p - window_length - 1.0, arrivals.p + 1.0),
            WindowKind::Signal => (arrivals.s - 1.0, arrivals.s + window_length + 1.0),
        }
    }
}

/// Cut the noise and signal windows out of `waveform`.
///
/// The arrivals are expected to have passed
/// [`validate_arrivals`](crate::validate::validate_arrivals); out-of-range
/// offsets surface here only as a trim error.
pub fn derive_windows(
    waveform: &Waveform,
    arrivals: &ArrivalTimes,
    window_length: f64,
) -> Result<(Waveform, Waveform), ConditioningError> {
    let cut = |kind: WindowKind| {
        let (left, right) = kind.bounds(arrivals, window_length);
        trim(waveform, left, right)
    };
    Ok((cut(WindowKind::Noise)?, cut(WindowKind::Signal)?))
}

/// Detrend then taper a window ahead of spectral analysis.
pub fn condition_window(
    window: &Waveform,
    detrend_kind: DetrendKind,
    taper_settings: &TaperSettings,
) -> Result<Waveform, ConditioningError> {
    let detrended = detrend(window, detrend_kind)?;
    taper(&detrended, taper_settings)
}
