//! File-based parameter loading
//!
//! Parameters come from a JSON document (every field optional) and the
//! repeat probability curve can be supplied separately as a CSV table with
//! `period,repeat_prob` columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::coerce::parse_or_zero;
use super::data::{ClvParameters, MAX_TIME_HORIZON};
use crate::error::{ClvError, Result};

/// Load parameters from a JSON file and normalise them to a valid horizon
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<ClvParameters> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let params = load_parameters_from_reader(file)?;
    debug!(
        "Loaded parameters from {} (horizon {})",
        path.display(),
        params.time_horizon
    );
    Ok(params)
}

/// Load parameters from any JSON reader
pub fn load_parameters_from_reader<R: Read>(reader: R) -> Result<ClvParameters> {
    let params: ClvParameters = serde_json::from_reader(reader)?;
    Ok(params.normalized())
}

/// Load a repeat probability curve from a CSV file
pub fn load_repeat_probabilities<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let curve = load_repeat_probabilities_from_reader(file).map_err(|e| match e {
        ClvError::MalformedInput { reason, .. } => ClvError::MalformedInput {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })?;
    debug!("Loaded {} repeat probabilities from {}", curve.len(), path.display());
    Ok(curve)
}

/// Load a repeat probability curve from any CSV reader.
///
/// Rows are keyed by period so they may appear in any order. Periods beyond
/// the maximum horizon are skipped and periods never mentioned read as 0.
/// Malformed probability cells are coerced to 0; a malformed period is an
/// error because the row cannot be placed.
pub fn load_repeat_probabilities_from_reader<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut curve = vec![0.0; MAX_TIME_HORIZON as usize];
    let mut periods_seen = 0usize;

    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        let raw_period = record.get(0).unwrap_or("").trim();
        let period: usize = raw_period.parse().map_err(|_| ClvError::MalformedInput {
            path: Default::default(),
            reason: format!("row {}: invalid period {:?}", i + 1, raw_period),
        })?;
        let prob = parse_or_zero(record.get(1).unwrap_or(""));

        if period < curve.len() {
            curve[period] = prob;
            periods_seen = periods_seen.max(period + 1);
        }
    }

    curve.truncate(periods_seen);
    Ok(curve)
}
