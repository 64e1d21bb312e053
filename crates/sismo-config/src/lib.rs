//! Configuration for the sismo strong-motion pipeline.
//!
//! Two TOML documents drive a run:
//!
//! - [`PipelineConfig`] - every processing parameter (filter, detrend, taper,
//!   window length, spectral grid and smoothing, SNR threshold, oscillator
//!   grid and damping). Missing keys take production defaults.
//! - [`ArrivalTable`] - P / S picks keyed by [`RecordId`](sismo_core::RecordId),
//!   with [`ArrivalTable::builtin`] holding the reference records.
//!
//! # Example
//!
//! ```rust,no_run
//! use sismo_config::{ArrivalTable, PipelineConfig};
//!
//! let config = PipelineConfig::load("pipeline.toml").unwrap();
//! config.validate().unwrap();
//!
//! let mut arrivals = ArrivalTable::builtin();
//! arrivals.merge(ArrivalTable::load("arrivals.toml").unwrap());
//! ```

mod arrivals;
mod error;
mod pipeline;

pub use arrivals::ArrivalTable;
pub use error::ConfigError;
pub use pipeline::{FilterSettings, PipelineConfig, ResponseSettings, SpectrumSettings};
