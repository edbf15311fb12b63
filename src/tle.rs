//! Two-Line Element (TLE) parsing.
//!
//! A deliberately permissive fixed-column reader: only the six line-2 fields
//! the propagator needs are required. Checksums, line numbers and line-1
//! fields are not validated; the NORAD number and epoch are read from line 1
//! on a best-effort basis.
//!
//! ```text
//! Line 0 (optional): Satellite name
//! Line 1: 1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//! Line 2: 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//! ```

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::{DomainError, OrbitalElements};
use crate::time::parse_tle_epoch;

/// Line-2 columns (0-based, end-exclusive) of the orbital elements.
const INCLINATION_COLS: Range<usize> = 8..16;
const RAAN_COLS: Range<usize> = 17..25;
const ECCENTRICITY_COLS: Range<usize> = 26..33;
const ARG_PERIGEE_COLS: Range<usize> = 34..42;
const MEAN_ANOMALY_COLS: Range<usize> = 43..51;
const MEAN_MOTION_COLS: Range<usize> = 52..63;

/// Line-1 columns of the metadata read on a best-effort basis.
const NORAD_ID_COLS: Range<usize> = 2..7;
const EPOCH_COLS: Range<usize> = 18..32;

/// TLE parsing errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TleError {
    #[error("line {line} has no '{field}' field (columns {}-{})", .columns.start + 1, .columns.end)]
    MissingField {
        field: &'static str,
        line: u8,
        columns: Range<usize>,
    },

    #[error("failed to parse field '{field}' from {value:?}: {source}")]
    Field {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("mean motion must be positive, got {0} rev/day")]
    NonPositiveMeanMotion(f64),

    #[error("incomplete TLE set starting at line {line}")]
    IncompleteSet { line: usize },

    #[error("no TLEs found in input")]
    Empty,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A parsed TLE: source lines, best-effort metadata, and validated elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tle {
    /// Name from line 0, if present.
    pub name: Option<String>,
    /// NORAD catalog number from line 1, if readable.
    pub norad_id: Option<u32>,
    /// Element epoch from line 1, if readable.
    pub epoch: Option<DateTime<Utc>>,
    pub line1: String,
    pub line2: String,
    pub elements: OrbitalElements,
}

impl Tle {
    /// Parse a TLE from two lines (without satellite name).
    pub fn parse(line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::parse_with_name(None, line1, line2)
    }

    /// Parse a TLE with its line-0 name.
    pub fn parse_named(name: &str, line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::parse_with_name(Some(clean_name(name)), line1, line2)
    }

    fn parse_with_name(name: Option<String>, line1: &str, line2: &str) -> Result<Self, TleError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        let elements = parse_elements(line2)?;

        let norad_id = column(line1, NORAD_ID_COLS).and_then(|s| s.trim().parse().ok());
        let epoch = column(line1, EPOCH_COLS).and_then(parse_tle_epoch);

        Ok(Self {
            name,
            norad_id,
            epoch,
            line1: line1.to_string(),
            line2: line2.to_string(),
            elements,
        })
    }

    /// Name to show for this object: line-0 name, else NORAD number, else "UNKNOWN".
    pub fn display_name(&self) -> String {
        match (&self.name, self.norad_id) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(id)) => id.to_string(),
            _ => "UNKNOWN".to_string(),
        }
    }
}

/// Extract the orbital elements from TLE line 2.
///
/// Angles are converted to radians and the bound-orbit domain is checked.
pub fn parse_elements(line2: &str) -> Result<OrbitalElements, TleError> {
    let inclination = parse_field(line2, "inclination", INCLINATION_COLS)?;
    let raan = parse_field(line2, "raan", RAAN_COLS)?;
    let eccentricity = parse_eccentricity(line2)?;
    let arg_perigee = parse_field(line2, "arg_perigee", ARG_PERIGEE_COLS)?;
    let mean_anomaly = parse_field(line2, "mean_anomaly", MEAN_ANOMALY_COLS)?;
    let mean_motion = parse_field(line2, "mean_motion", MEAN_MOTION_COLS)?;

    // Also rejects NaN
    if !(mean_motion > 0.0) {
        return Err(TleError::NonPositiveMeanMotion(mean_motion));
    }

    Ok(OrbitalElements::from_degrees(
        inclination,
        raan,
        eccentricity,
        arg_perigee,
        mean_anomaly,
        mean_motion,
    )?)
}

/// Parse a catalog of 3-line (name + two lines) and/or bare 2-line sets.
///
/// Blank lines are skipped. A line starting with `1 ` directly followed by a
/// line starting with `2 ` is taken as an unnamed set.
pub fn parse_catalog(text: &str) -> Result<Vec<Tle>, TleError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end()))
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    let mut tles = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let (line_no, first) = lines[i];
        let bare_set = first.starts_with("1 ")
            && lines.get(i + 1).is_some_and(|(_, next)| next.starts_with("2 "));

        if bare_set {
            tles.push(Tle::parse(first, lines[i + 1].1)?);
            i += 2;
        } else {
            let (Some((_, line1)), Some((_, line2))) = (lines.get(i + 1), lines.get(i + 2)) else {
                return Err(TleError::IncompleteSet { line: line_no });
            };
            tles.push(Tle::parse_named(first, line1, line2)?);
            i += 3;
        }
    }

    if tles.is_empty() {
        return Err(TleError::Empty);
    }
    Ok(tles)
}

/// Columns `cols` of `line`, clipped to the line length.
///
/// `None` if the field starts past the end of the line or splits a character.
fn column(line: &str, cols: Range<usize>) -> Option<&str> {
    if cols.start >= line.len() {
        return None;
    }
    line.get(cols.start..cols.end.min(line.len()))
}

fn parse_field(line2: &str, field: &'static str, cols: Range<usize>) -> Result<f64, TleError> {
    let raw = column(line2, cols.clone()).ok_or(TleError::MissingField {
        field,
        line: 2,
        columns: cols,
    })?;
    let value = raw.trim();
    value.parse::<f64>().map_err(|source| TleError::Field {
        field,
        value: value.to_string(),
        source,
    })
}

/// Eccentricity is stored as digits with an implied leading "0.".
fn parse_eccentricity(line2: &str) -> Result<f64, TleError> {
    let field = "eccentricity";
    let raw = column(line2, ECCENTRICITY_COLS).ok_or(TleError::MissingField {
        field,
        line: 2,
        columns: ECCENTRICITY_COLS,
    })?;
    let digits = raw.trim();
    format!("0.{digits}").parse::<f64>().map_err(|source| TleError::Field {
        field,
        value: digits.to_string(),
        source,
    })
}

/// Strip the optional "0 " prefix of 3LE name lines.
fn clean_name(name: &str) -> String {
    let name = name.trim();
    name.strip_prefix("0 ").map(str::trim).unwrap_or(name).to_string()
}
