//! Processing parameters for one pipeline run.

use serde::{Deserialize, Serialize};
use sismo_analysis::{AccelerationUnits, FrequencyGrid, linspace_periods};
use sismo_core::{DetrendKind, TaperSettings};
use std::path::Path;

use crate::error::ConfigError;

/// Broadband Butterworth filter applied to the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Lower corner in Hz; absent means no highpass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq_min: Option<f64>,
    /// Upper corner in Hz; absent means no lowpass.
    ///
    /// Each record also requires this to be no larger than its duration in
    /// seconds. With the default of 100 Hz, any record shorter than 100 s
    /// fails conditioning and is skipped. Lower it or set it to `None` for
    /// short records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq_max: Option<f64>,
    /// Filter order.
    pub corners: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            freq_min: Some(0.1),
            freq_max: Some(100.0),
            corners: 4,
        }
    }
}

/// Fourier spectrum resampling, smoothing and masking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumSettings {
    /// Konno-Ohmachi bandwidth coefficient.
    pub konno_ohmachi_bandwidth: f64,
    /// Number of smoothing passes.
    pub smoothing_passes: usize,
    /// Signal-to-noise ratio a point must exceed to be kept.
    pub signal_to_noise: f64,
    /// Log-spaced grid the spectra are resampled onto.
    pub grid: FrequencyGrid,
}

impl Default for SpectrumSettings {
    fn default() -> Self {
        Self {
            konno_ohmachi_bandwidth: 50.0,
            smoothing_passes: 1,
            signal_to_noise: 5.0,
            grid: FrequencyGrid::default(),
        }
    }
}

/// Oscillator grid for the response spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSettings {
    /// Shortest period in seconds.
    pub period_min: f64,
    /// Longest period in seconds.
    pub period_max: f64,
    /// Number of evenly spaced periods.
    pub period_count: usize,
    /// Damping ratio.
    pub damping: f64,
    /// Units of the recorded acceleration.
    pub units: AccelerationUnits,
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self {
            period_min: 0.01,
            period_max: 20.0,
            period_count: 300,
            damping: 0.05,
            units: AccelerationUnits::MetresPerSecondSquared,
        }
    }
}

impl ResponseSettings {
    /// The period grid.
    pub fn periods(&self) -> Result<Vec<f64>, ConfigError> {
        linspace_periods(self.period_min, self.period_max, self.period_count)
            .map_err(|e| ConfigError::invalid("response.period", e.to_string()))
    }
}

/// Every tunable parameter of the pipeline.
///
/// Missing keys take their default, so an empty file is a valid
/// configuration.
///
/// # TOML Format
///
/// ```toml
/// detrend = "simple"
/// window_length = 5.0
///
/// [filter]
/// freq_min = 0.1
/// freq_max = 100.0
/// corners = 4
///
/// [taper]
/// type = "parzen"
/// side = "both"
/// max_length = 1.0
///
/// [spectrum]
/// konno_ohmachi_bandwidth = 50.0
/// smoothing_passes = 1
/// signal_to_noise = 5.0
///
/// [spectrum.grid]
/// min_freq = 0.2
/// max_freq = 30.0
/// points = 30
///
/// [response]
/// period_min = 0.01
/// period_max = 20.0
/// period_count = 300
/// damping = 0.05
/// units = "m/s^2"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detrend used after broadband filtering and on each window.
    pub detrend: DetrendKind,
    /// Noise / signal window length in seconds.
    pub window_length: f64,
    /// Broadband filter.
    pub filter: FilterSettings,
    /// Window taper.
    pub taper: TaperSettings,
    /// Spectral analysis.
    pub spectrum: SpectrumSettings,
    /// Response spectrum.
    pub response: ResponseSettings,
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check that every parameter is usable, reporting the first that is not.
    ///
    /// Filter corners are only checked against each other here; the bounds
    /// that depend on the record (duration, Nyquist) are checked per record.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.window_length.is_finite() && self.window_length > 0.0) {
            return Err(ConfigError::invalid(
                "window_length",
                format!("must be positive, got {}", self.window_length),
            ));
        }

        let filter = &self.filter;
        if filter.corners == 0 {
            return Err(ConfigError::invalid("filter.corners", "must be at least 1"));
        }
        match (filter.freq_min, filter.freq_max) {
            (None, None) => {
                return Err(ConfigError::invalid(
                    "filter",
                    "at least one of freq_min and freq_max is required",
                ));
            }
            (Some(lo), Some(hi)) if lo >= hi => {
                return Err(ConfigError::invalid(
                    "filter",
                    format!("freq_min ({lo}) must be below freq_max ({hi})"),
                ));
            }
            _ => {}
        }

        if !(self.taper.max_length.is_finite() && self.taper.max_length >= 0.0) {
            return Err(ConfigError::invalid(
                "taper.max_length",
                format!("must be >= 0, got {}", self.taper.max_length),
            ));
        }

        let spectrum = &self.spectrum;
        spectrum
            .grid
            .frequencies()
            .map_err(|e| ConfigError::invalid("spectrum.grid", e.to_string()))?;
        if !(spectrum.konno_ohmachi_bandwidth.is_finite() && spectrum.konno_ohmachi_bandwidth > 0.0) {
            return Err(ConfigError::invalid(
                "spectrum.konno_ohmachi_bandwidth",
                format!("must be positive, got {}", spectrum.konno_ohmachi_bandwidth),
            ));
        }
        if !(spectrum.signal_to_noise.is_finite() && spectrum.signal_to_noise >= 0.0) {
            return Err(ConfigError::invalid(
                "spectrum.signal_to_noise",
                format!("must be >= 0, got {}", spectrum.signal_to_noise),
            ));
        }

        self.response.periods()?;
        if !(self.response.damping.is_finite() && self.response.damping >= 0.0) {
            return Err(ConfigError::invalid(
                "response.damping",
                format!("must be >= 0, got {}", self.response.damping),
            ));
        }
        Ok(())
    }
}
