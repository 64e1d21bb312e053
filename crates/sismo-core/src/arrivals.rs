//! P- and S-wave arrival picks.

use crate::waveform::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw arrival picks as supplied by a lookup, either of which may be absent.
///
/// Offsets are in seconds relative to the start of the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrivalPicks {
    /// P-wave arrival offset.
    #[serde(default)]
    pub p: Option<f64>,
    /// S-wave arrival offset.
    #[serde(default)]
    pub s: Option<f64>,
}

impl ArrivalPicks {
    /// Picks with both phases present.
    pub const fn new(p: f64, s: f64) -> Self {
        Self {
            p: Some(p),
            s: Some(s),
        }
    }
}

/// Validated arrival times, produced by
/// [`validate_arrivals`](crate::validate::validate_arrivals).
///
/// Invariant: `p < s`, and both leave room for a noise and a signal window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrivalTimes {
    /// P-wave arrival offset in seconds.
    pub p: f64,
    /// S-wave arrival offset in seconds.
    pub s: f64,
}

/// Source of arrival picks keyed by record identifier.
pub trait ArrivalLookup {
    /// Picks for the record, or `None` if the record is unknown.
    fn lookup(&self, id: &RecordId) -> Option<ArrivalPicks>;
}

impl ArrivalLookup for HashMap<RecordId, ArrivalPicks> {
    fn lookup(&self, id: &RecordId) -> Option<ArrivalPicks> {
        self.get(id).copied()
    }
}

impl<T: ArrivalLookup + ?Sized> ArrivalLookup for &T {
    fn lookup(&self, id: &RecordId) -> Option<ArrivalPicks> {
        (**self).lookup(id)
    }
}
