//! Sismo Analysis - frequency-domain and response-spectrum tools
//!
//! This crate turns conditioned record windows into the quantities used in
//! engineering seismology:
//!
//! - [`fft`] - FFT wrapper for real traces
//! - [`spectrum`] - Fourier amplitude spectra, log-log resampling, SNR masking
//! - [`konno_ohmachi`] - Konno-Ohmachi log-frequency smoothing
//! - [`response`] - Nigam-Jennings oscillator response spectra and ground-motion peaks
//!
//! ## Example
//!
//! ```rust,ignore
//! use sismo_analysis::{FrequencyGrid, analyze_window, apply_signal_to_noise_ratio};
//!
//! let grid = FrequencyGrid::default();
//! let noise = analyze_window(&noise_channel, &grid, 50.0, 1)?;
//! let signal = analyze_window(&signal_channel, &grid, 50.0, 1)?;
//! let masked = apply_signal_to_noise_ratio(&noise.smoothed.amps, &signal.smoothed.amps, 5.0)?;
//! ```

pub mod error;
pub mod fft;
pub mod konno_ohmachi;
pub mod response;
pub mod spectrum;

pub use error::AnalysisError;
pub use fft::Fft;
pub use konno_ohmachi::{konno_ohmachi_smoothing, konno_ohmachi_window, smooth_spectrum};
pub use response::{
    AccelerationUnits, GroundMotionPeaks, Oscillator, OscillatorPeaks, ResponseSpectrumResult,
    STANDARD_GRAVITY, channel_response_spectrum, ground_motion_peaks, linspace_periods,
    response_spectrum,
};
pub use spectrum::{
    FourierSpectrum, FrequencyGrid, SpectrumResult, analyze_window, apply_signal_to_noise_ratio,
    channel_spectrum, fourier_amplitude_spectrum, interpolate_log_log, interpolate_log_spectrum,
    log_space,
};
