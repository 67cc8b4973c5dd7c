//! Legacy scalar state files.
//!
//! The persisted form is two lines of text: a header naming the six fields,
//! then one tab-separated record with numeric values rounded to 4 decimals
//! and the two variant flags spelled `True`/`False`:
//!
//! ```text
//! # L    T    beta    z    opthin    pl
//! 12.0000	35.0000	1.8000	2.0000	False	False
//! ```
//!
//! Loading reconstructs a model through the normal constructor path, which
//! re-runs normalization calibration against the stored luminosity.

use std::fs;
use std::path::Path;

use crate::domain::StateRecord;
use crate::error::MbbError;
use crate::mbb::ModifiedBlackbody;

const HEADER: &str = "# L    T    beta    z    opthin    pl\n";

fn flag(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn parse_flag(s: &str) -> Result<bool, MbbError> {
    match s {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(MbbError::Data(format!(
            "invalid variant flag '{other}' (expected True or False)"
        ))),
    }
}

/// Write a state record to `path`.
pub fn write_state(path: &Path, record: &StateRecord) -> Result<(), MbbError> {
    let mut text = String::from(HEADER);
    text.push_str(&format!(
        "{:.4}\t{:.4}\t{:.4}\t{:.4}\t{}\t{}\t\n",
        record.log_l,
        record.t,
        record.beta,
        record.z,
        flag(record.opthin),
        flag(record.pl),
    ));
    fs::write(path, text).map_err(|e| {
        MbbError::Io(format!("failed to write state file '{}': {e}", path.display()))
    })
}

/// Parse a state record from `path`.
pub fn read_state(path: &Path) -> Result<StateRecord, MbbError> {
    let text = fs::read_to_string(path).map_err(|e| {
        MbbError::Io(format!("failed to read state file '{}': {e}", path.display()))
    })?;

    let record_line = text
        .lines()
        .nth(1)
        .ok_or_else(|| MbbError::Data("state file has no record line".to_string()))?;
    let bits: Vec<&str> = record_line.split('\t').collect();
    if bits.len() < 6 {
        return Err(MbbError::Data(format!(
            "state record has {} fields, expected 6",
            bits.len()
        )));
    }

    let num = |i: usize, name: &str| -> Result<f64, MbbError> {
        bits[i]
            .parse::<f64>()
            .map_err(|_| MbbError::Data(format!("invalid {name} value '{}'", bits[i])))
    };

    Ok(StateRecord {
        log_l: num(0, "luminosity")?,
        t: num(1, "temperature")?,
        beta: num(2, "beta")?,
        z: num(3, "redshift")?,
        opthin: parse_flag(bits[4])?,
        pl: parse_flag(bits[5])?,
    })
}

/// Load a model from a state file, re-running calibration.
pub fn load_model(path: &Path) -> Result<ModifiedBlackbody, MbbError> {
    let record = read_state(path)?;
    ModifiedBlackbody::from_state_record(&record)
}
