//! Error types for validation and signal conditioning.

use thiserror::Error;

/// A waveform or its arrival picks failed a pre-flight check.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The waveform has no channels.
    #[error("no channels found in the waveform")]
    EmptyWaveform,

    /// A channel carries no samples.
    #[error("channel '{0}' is empty")]
    EmptyChannel(String),

    /// The sampling rate still holds the unset sentinel value of exactly 1 Hz.
    #[error("sampling rate of channel '{0}' is not set")]
    UnsetSamplingParameters(String),

    /// The sampling rate is not a positive finite number.
    #[error("channel '{component}' has invalid sampling rate {rate}")]
    InvalidSamplingRate {
        /// Component label.
        component: String,
        /// Offending rate.
        rate: f64,
    },

    /// A channel does not share the time base of the first channel.
    #[error("channel '{component}' does not share the record's {field}")]
    InconsistentChannels {
        /// Component label.
        component: String,
        /// Which property differs (station, start time, sampling rate, npts).
        field: &'static str,
    },

    /// Two channels carry the same component label.
    #[error("component '{0}' appears more than once")]
    DuplicateComponent(String),

    /// No P-wave arrival was supplied.
    #[error("record has no P-wave arrival")]
    MissingPArrival,

    /// No S-wave arrival was supplied.
    #[error("record has no S-wave arrival")]
    MissingSArrival,

    /// An arrival pick is NaN or infinite.
    #[error("{phase} arrival must be a finite offset, got {value}")]
    NonFiniteArrival {
        /// Phase of the pick, "P" or "S".
        phase: &'static str,
        /// Offending offset.
        value: f64,
    },

    /// The P arrival is not strictly before the S arrival.
    #[error("P arrival ({p}) must be earlier than S arrival ({s})")]
    InvalidArrivalOrder {
        /// P arrival offset in seconds.
        p: f64,
        /// S arrival offset in seconds.
        s: f64,
    },

    /// Not enough lead time before P to form the noise window.
    #[error("P arrival ({p}) is too early for window length {window_length}; it must be at least {minimum}")]
    PArrivalTooEarly {
        /// P arrival offset in seconds.
        p: f64,
        /// Window length in seconds.
        window_length: f64,
        /// Smallest acceptable P offset.
        minimum: f64,
    },

    /// Not enough trailing time after S to form the signal window.
    #[error("S arrival ({s}) is too late for window length {window_length}; it must be at most {maximum}")]
    SArrivalTooLate {
        /// S arrival offset in seconds.
        s: f64,
        /// Window length in seconds.
        window_length: f64,
        /// Largest acceptable S offset.
        maximum: f64,
    },
}

/// A conditioning operation (filter, detrend, trim, taper) could not run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConditioningError {
    /// Corner frequencies outside the sanity bounds, or min not below max.
    #[error("invalid frequency range: min={min:?}, max={max:?} (duration {duration}s)")]
    InvalidFrequencyRange {
        /// Lower corner in Hz.
        min: Option<f64>,
        /// Upper corner in Hz.
        max: Option<f64>,
        /// Waveform duration in seconds.
        duration: f64,
    },

    /// Neither corner frequency was given.
    #[error("a filter needs at least one corner frequency")]
    MissingCorner,

    /// A corner cannot be realised at this sampling rate.
    #[error("corner frequency {freq} Hz must lie strictly between 0 and the Nyquist frequency {nyquist} Hz")]
    DegenerateCorner {
        /// Corner in Hz.
        freq: f64,
        /// Nyquist frequency in Hz.
        nyquist: f64,
    },

    /// Filter order of zero.
    #[error("filter needs at least one corner (order), got {0}")]
    InvalidCornerOrder(usize),

    /// Trim bounds outside the waveform.
    #[error("invalid trim range [{left}, {right}] for duration {duration}s")]
    InvalidTrimRange {
        /// Left offset in seconds.
        left: f64,
        /// Right offset in seconds.
        right: f64,
        /// Waveform duration in seconds.
        duration: f64,
    },

    /// The operation was given a channel without samples.
    #[error("channel '{0}' has no samples to condition")]
    EmptyInput(String),

    /// Negative or non-finite taper length.
    #[error("invalid taper length {0}s")]
    InvalidTaperLength(f64),
}
