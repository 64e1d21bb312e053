//! Arrival pick tables keyed by record identifier.

use serde::{Deserialize, Serialize};
use sismo_core::{ArrivalLookup, ArrivalPicks, RecordId};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

/// Picks shipped with the crate for the reference records.
const BUILTIN_PICKS: [(&str, f64, f64); 3] = [
    ("20140126_135529_VSK1", 18.0, 23.0),
    ("20140126_135537_ARG2", 8.0, 12.0),
    ("20140126_135537_ZAK2", 15.0, 30.0),
];

/// P / S picks for a set of records.
///
/// # TOML Format
///
/// ```toml
/// [records.20140126_135529_VSK1]
/// p = 18.0
/// s = 23.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrivalTable {
    /// Picks by record.
    #[serde(default)]
    pub records: BTreeMap<RecordId, ArrivalPicks>,
}

impl ArrivalTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the reference picks.
    pub fn builtin() -> Self {
        BUILTIN_PICKS
            .iter()
            .map(|&(id, p, s)| (RecordId::from_raw(id), ArrivalPicks::new(p, s)))
            .collect()
    }

    /// Load a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a table from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Add or replace the picks of a record.
    pub fn insert(&mut self, id: RecordId, picks: ArrivalPicks) {
        self.records.insert(id, picks);
    }

    /// Entries of `other` replace entries with the same identifier.
    pub fn merge(&mut self, other: ArrivalTable) {
        self.records.extend(other.records);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(RecordId, ArrivalPicks)> for ArrivalTable {
    fn from_iter<I: IntoIterator<Item = (RecordId, ArrivalPicks)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl ArrivalLookup for ArrivalTable {
    fn lookup(&self, id: &RecordId) -> Option<ArrivalPicks> {
        self.records.get(id).copied()
    }
}
