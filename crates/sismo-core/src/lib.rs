//! Sismo Core - waveform model, validation and signal conditioning
//!
//! This crate holds everything that happens to a strong-motion record before
//! it reaches the frequency domain.
//!
//! # Data Model
//!
//! - [`Waveform`] - one or more [`Channel`]s sharing a time base
//! - [`RecordId`] - deterministic `{date}_{time}_{station}` key
//! - [`ArrivalPicks`] / [`ArrivalTimes`] - P and S arrival offsets, and the
//!   [`ArrivalLookup`] trait used to fetch them
//!
//! # Validation
//!
//! - [`validate_waveform`] - structural checks on a parsed record
//! - [`validate_arrivals`] - arrival order and window headroom
//!
//! # Conditioning
//!
//! All operations return new data and leave their input untouched:
//!
//! - [`filter`] - zero-phase Butterworth bandpass / highpass / lowpass
//! - [`detrend`] - [`DetrendKind::Simple`], [`DetrendKind::Linear`] or [`DetrendKind::Constant`]
//! - [`trim`] - cut by offsets from the start, snapping to the nearest sample
//! - [`taper`] - edge taper built from a [`TaperKind`] window
//!
//! # Windowing
//!
//! - [`derive_windows`] - noise and signal windows around the arrivals
//! - [`condition_window`] - detrend and taper a window for spectral analysis
//!
//! # Example
//!
//! ```rust,ignore
//! use sismo_core::{ArrivalPicks, DetrendKind, derive_windows, filter, detrend, validate_arrivals};
//!
//! let broadband = detrend(&filter(&waveform, Some(0.1), Some(20.0), 4)?, DetrendKind::Simple)?;
//! let arrivals = validate_arrivals(&broadband, &ArrivalPicks::new(18.0, 23.0), 5.0)?;
//! let (noise, signal) = derive_windows(&broadband, &arrivals, 5.0)?;
//! ```

pub mod arrivals;
pub mod biquad;
pub mod butterworth;
pub mod condition;
pub mod error;
pub mod taper;
pub mod validate;
pub mod waveform;
pub mod window;

pub use arrivals::{ArrivalLookup, ArrivalPicks, ArrivalTimes};
pub use biquad::Biquad;
pub use butterworth::{FilterBand, butterworth, filter_causal, filter_zero_phase, magnitude_response};
pub use condition::{
    DetrendKind, TaperSettings, detrend, detrend_channel, detrend_samples, filter, filter_channel,
    taper, taper_channel, trim, trim_channel,
};
pub use error::{ConditioningError, ValidationError};
pub use taper::{TaperKind, TaperSide, taper_weights};
pub use validate::{UNSET_SAMPLING_RATE, validate_arrivals, validate_waveform};
pub use waveform::{Channel, RecordId, Waveform, seconds_to_duration};
pub use window::{WindowKind, condition_window, derive_windows};
