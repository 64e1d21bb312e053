//! In-memory representation of a multi-channel strong-motion record.
//!
//! A [`Waveform`] is a plain collection of [`Channel`] values. Each channel
//! carries its own time base (station, start time, sampling rate) so that a
//! single channel can be handed to the analysis stage on its own; the
//! [`validate_waveform`](crate::validate::validate_waveform) check enforces that
//! every channel of a waveform shares the same time base.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single component (e.g. "E", "N", "Z") of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Station code the channel was recorded at.
    pub station: String,
    /// Component label, unique within a waveform.
    pub component: String,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Absolute time of the first sample.
    pub start_time: DateTime<Utc>,
    /// Sample values, one per time step.
    pub samples: Vec<f64>,
}

impl Channel {
    /// Create a new channel.
    pub fn new(
        station: impl Into<String>,
        component: impl Into<String>,
        sampling_rate: f64,
        start_time: DateTime<Utc>,
        samples: Vec<f64>,
    ) -> Self {
        Self {
            station: station.into(),
            component: component.into(),
            sampling_rate,
            start_time,
            samples,
        }
    }

    /// Number of samples.
    pub fn npts(&self) -> usize {
        self.samples.len()
    }

    /// Sampling interval in seconds.
    pub fn delta(&self) -> f64 {
        1.0 / self.sampling_rate
    }

    /// Time span between the first and the last sample, in seconds.
    ///
    /// A channel with zero or one sample has a duration of zero.
    pub fn duration(&self) -> f64 {
        self.npts().saturating_sub(1) as f64 / self.sampling_rate
    }

    /// Absolute time of the last sample.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + seconds_to_duration(self.duration())
    }

    /// Sample times relative to the start, in seconds.
    pub fn times(&self) -> Vec<f64> {
        let delta = self.delta();
        (0..self.npts()).map(|i| i as f64 * delta).collect()
    }

    /// Copy of this channel's metadata with new sample data.
    pub fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self {
            station: self.station.clone(),
            component: self.component.clone(),
            sampling_rate: self.sampling_rate,
            start_time: self.start_time,
            samples,
        }
    }
}

/// A multi-channel record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    /// Channels in file order.
    pub channels: Vec<Channel>,
}

impl Waveform {
    /// Create a waveform from its channels.
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if the waveform has no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// First channel, which defines the time base of the record.
    pub fn first(&self) -> Option<&Channel> {
        self.channels.first()
    }

    /// Look up a channel by component label.
    pub fn channel(&self, component: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.component == component)
    }

    /// Iterate over the channels.
    pub fn iter(&self) -> std::slice::Iter<'_, Channel> {
        self.channels.iter()
    }

    /// Station code of the first channel.
    pub fn station(&self) -> Option<&str> {
        self.first().map(|c| c.station.as_str())
    }

    /// Start time of the first channel.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.first().map(|c| c.start_time)
    }

    /// Duration of the first channel in seconds, or zero for an empty waveform.
    pub fn duration(&self) -> f64 {
        self.first().map_or(0.0, Channel::duration)
    }

    /// Deterministic identifier of this record, if it has any channel.
    pub fn record_id(&self) -> Option<RecordId> {
        self.first()
            .map(|c| RecordId::new(c.start_time, &c.station))
    }

    /// Apply a per-channel transform, producing a new waveform.
    pub fn try_map<E>(&self, f: impl FnMut(&Channel) -> Result<Channel, E>) -> Result<Self, E> {
        let channels = self
            .channels
            .iter()
            .map(f)
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { channels })
    }
}

impl<'a> IntoIterator for &'a Waveform {
    type Item = &'a Channel;
    type IntoIter = std::slice::Iter<'a, Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter()
    }
}

/// Key identifying a record: start date, start time and station with every
/// `-` and `:` separator stripped, e.g. `20140126_135529_VSK1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Station label used when the record has none.
    pub const UNKNOWN_STATION: &'static str = "STATION";

    /// Derive the identifier from a start time and a station code.
    ///
    /// Fractional seconds appear (as microseconds) only when non-zero.
    pub fn new(start_time: DateTime<Utc>, station: &str) -> Self {
        let station = if station.is_empty() {
            Self::UNKNOWN_STATION
        } else {
            station
        };
        let date = start_time.format("%Y-%m-%d");
        let micros = start_time.timestamp_subsec_micros();
        let time = if micros == 0 {
            start_time.format("%H:%M:%S").to_string()
        } else {
            format!("{}.{micros:06}", start_time.format("%H:%M:%S"))
        };
        let raw = format!("{date}_{time}_{station}");
        Self(raw.replace(':', "").replace('-', ""))
    }

    /// Wrap an already-derived identifier (e.g. a key read from a table).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert fractional seconds to a chrono duration with nanosecond resolution.
pub fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::nanoseconds((seconds * 1e9).round() as i64)
}
