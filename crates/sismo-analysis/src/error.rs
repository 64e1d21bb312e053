//! Errors raised by spectral and response-spectrum analysis.

use thiserror::Error;

/// An analysis routine received input it cannot work with.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Too few samples or spectral points.
    #[error("need at least {needed} samples, got {got}")]
    InsufficientSamples {
        /// Minimum required.
        needed: usize,
        /// Number supplied.
        got: usize,
    },

    /// Two arrays that must line up have different lengths.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first array.
        left: usize,
        /// Length of the second array.
        right: usize,
    },

    /// Frequency grid bounds or point count are unusable.
    #[error("invalid frequency grid: {min} to {max} Hz with {points} points")]
    InvalidFrequencyGrid {
        /// Lowest frequency in Hz.
        min: f64,
        /// Highest frequency in Hz.
        max: f64,
        /// Number of grid points.
        points: usize,
    },

    /// Konno-Ohmachi bandwidth must be positive and finite.
    #[error("invalid smoothing bandwidth {0}")]
    InvalidBandwidth(f64),

    /// Oscillator periods must be positive and finite.
    #[error("invalid oscillator period {0}s")]
    InvalidPeriod(f64),

    /// Damping ratio must be non-negative and finite.
    #[error("invalid damping ratio {0}")]
    InvalidDamping(f64),

    /// Sampling interval must be positive and finite.
    #[error("invalid time step {0}s")]
    InvalidTimeStep(f64),
}
