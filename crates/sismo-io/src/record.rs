//! Fixed-format text record reader.
//!
//! Layout (1-based lines):
//!
//! ```text
//! 2   <label>: <station>
//! 3   <label>: <start time>
//! 4   <label>: <sampling rate>[ Hz]
//! 5   <label>: <sample count>
//! 8   <label>: <component> <component> ...
//! 11+ one row per time step, one column per component
//! ```
//!
//! Other lines are free text and ignored.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sismo_core::{Channel, Waveform};
use std::path::Path;
use tracing::warn;

const STATION_LINE: usize = 1;
const START_TIME_LINE: usize = 2;
const RATE_LINE: usize = 3;
const NPTS_LINE: usize = 4;
const COMPONENTS_LINE: usize = 7;
const FIRST_ROW_LINE: usize = 10;

/// Naive timestamp layouts accepted after RFC 3339, all read as UTC.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Header fields of a text record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordHeader {
    /// Station code.
    pub station: String,
    /// Time of the first sample.
    pub start_time: DateTime<Utc>,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Sample count announced by the header.
    pub npts: usize,
    /// Component labels in column order.
    pub components: Vec<String>,
}

impl RecordHeader {
    fn parse(lines: &[&str]) -> Result<Self> {
        let station = field(lines, STATION_LINE, "station")?
            .split(':')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let raw_time = field(lines, START_TIME_LINE, "start time")?.trim();
        let start_time = parse_timestamp(raw_time).ok_or_else(|| Error::MalformedHeader {
            line: START_TIME_LINE + 1,
            field: "start time",
            value: raw_time.to_string(),
        })?;

        let raw_rate = field(lines, RATE_LINE, "sampling rate")?;
        let rate_text = raw_rate.trim_matches(|c: char| c.is_whitespace() || "HhZz".contains(c));
        let sampling_rate = rate_text
            .parse::<f64>()
            .map_err(|_| Error::MalformedHeader {
                line: RATE_LINE + 1,
                field: "sampling rate",
                value: raw_rate.trim().to_string(),
            })?;

        let raw_npts = field(lines, NPTS_LINE, "sample count")?.trim();
        let npts = raw_npts.parse::<usize>().map_err(|_| Error::MalformedHeader {
            line: NPTS_LINE + 1,
            field: "sample count",
            value: raw_npts.to_string(),
        })?;

        let raw_components = field(lines, COMPONENTS_LINE, "components")?;
        let components: Vec<String> = raw_components
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if components.is_empty() {
            return Err(Error::MalformedHeader {
                line: COMPONENTS_LINE + 1,
                field: "components",
                value: raw_components.trim().to_string(),
            });
        }

        Ok(Self {
            station,
            start_time,
            sampling_rate,
            npts,
            components,
        })
    }
}

/// Text after the first ':' of a header line.
fn field<'a>(lines: &[&'a str], index: usize, name: &'static str) -> Result<&'a str> {
    let line = lines.get(index).ok_or(Error::MissingLine {
        line: index + 1,
        field: name,
    })?;
    line.split_once(':')
        .map(|(_, value)| value)
        .ok_or_else(|| Error::MalformedHeader {
            line: index + 1,
            field: name,
            value: line.trim().to_string(),
        })
}

/// Parse a start time as RFC 3339 or one of the naive layouts (read as UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|t| t.and_utc())
}

/// Parse a text record into a waveform with one channel per component.
///
/// The header sample count is advisory: when it disagrees with the number of
/// data rows a warning is logged and the rows win.
pub fn parse_record(text: &str) -> Result<Waveform> {
    let lines: Vec<&str> = text.lines().collect();
    let header = RecordHeader::parse(&lines)?;
    let width = header.components.len();

    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(header.npts); width];
    for (index, line) in lines.iter().enumerate().skip(FIRST_ROW_LINE) {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() != width {
            return Err(Error::MalformedRow {
                line: index + 1,
                reason: format!("expected {width} columns, found {}", cells.len()),
            });
        }
        for (column, cell) in columns.iter_mut().zip(&cells) {
            let value = cell.parse::<f64>().map_err(|_| Error::MalformedRow {
                line: index + 1,
                reason: format!("'{cell}' is not a number"),
            })?;
            column.push(value);
        }
    }

    let rows = columns.first().map_or(0, Vec::len);
    if rows != header.npts {
        warn!(
            station = %header.station,
            header_npts = header.npts,
            rows,
            "sample count in header does not match data rows, using rows"
        );
    }

    let channels = header
        .components
        .into_iter()
        .zip(columns)
        .map(|(component, samples)| {
            Channel::new(
                header.station.clone(),
                component,
                header.sampling_rate,
                header.start_time,
                samples,
            )
        })
        .collect();
    Ok(Waveform::new(channels))
}

/// Read and parse a text record file.
pub fn read_record<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let text = std::fs::read_to_string(path)?;
    parse_record(&text)
}
