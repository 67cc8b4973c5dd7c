//! Photometry CSV ingest.
//!
//! Expected schema (header names, any column order):
//!
//! ```text
//! wavelength_um,flux_jy,flux_err_jy
//! ```
//!
//! Design goals, in order:
//! - strict schema for the required columns (clear errors, exit code 2)
//! - row-level validation: skip malformed rows but report what happened
//! - no fitting logic here; value-level filtering (negative fluxes,
//!   zero uncertainties) is `Photometry::new`'s job

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::Photometry;
use crate::error::MbbError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based record number (excluding the header).
    pub line: usize,
    pub message: String,
}

/// Load photometry from a CSV file.
///
/// Returns the validated photometry together with per-row errors for
/// reporting. Fails outright if required columns are missing or if no
/// usable points remain.
pub fn load_photometry_csv(path: &Path) -> Result<(Photometry, Vec<RowError>), MbbError> {
    let file = File::open(path).map_err(|e| {
        MbbError::Io(format!("failed to open photometry CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| MbbError::Io(format!("failed to read CSV headers: {e}")))?
        .clone();

    let col = |name: &str| -> Result<usize, MbbError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| MbbError::InvalidPhotometry(format!("missing CSV column '{name}'")))
    };
    let wl_col = col("wavelength_um")?;
    let flux_col = col("flux_jy")?;
    let err_col = col("flux_err_jy")?;

    let mut wl = Vec::new();
    let mut flux = Vec::new();
    let mut err = Vec::new();
    let mut row_errors = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let line = i + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("unreadable record: {e}"),
                });
                continue;
            }
        };
        match parse_row(&record, wl_col, flux_col, err_col) {
            Ok((w, f, e)) => {
                wl.push(w);
                flux.push(f);
                err.push(e);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let phot = Photometry::new(&wl, &flux, &err)?;
    Ok((phot, row_errors))
}

fn parse_row(
    record: &StringRecord,
    wl_col: usize,
    flux_col: usize,
    err_col: usize,
) -> Result<(f64, f64, f64), String> {
    let field = |idx: usize, name: &str| -> Result<f64, String> {
        let raw = record
            .get(idx)
            .ok_or_else(|| format!("missing field '{name}'"))?;
        raw.parse::<f64>()
            .map_err(|_| format!("invalid {name} value '{raw}'"))
    };
    Ok((
        field(wl_col, "wavelength_um")?,
        field(flux_col, "flux_jy")?,
        field(err_col, "flux_err_jy")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phot.csv");
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_well_formed_photometry() {
        let (_dir, path) = write_csv(
            "wavelength_um,flux_jy,flux_err_jy\n100.0,0.030,0.003\n250.0,0.020,0.002\n500.0,0.004,0.0004\n",
        );
        let (phot, row_errors) = load_photometry_csv(&path).unwrap();
        assert_eq!(phot.len(), 3);
        assert!(row_errors.is_empty());
        assert!(phot.fits_beta());
    }

    #[test]
    fn reports_malformed_rows_and_keeps_the_rest() {
        let (_dir, path) = write_csv(
            "wavelength_um,flux_jy,flux_err_jy\n100.0,0.030,0.003\nnot_a_number,0.1,0.01\n250.0,0.020,0.002\n",
        );
        let (phot, row_errors) = load_photometry_csv(&path).unwrap();
        assert_eq!(phot.len(), 2);
        assert_eq!(row_errors.len(), 1);
        assert_eq!(row_errors[0].line, 2);
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let (_dir, path) = write_csv("wavelength_um,flux_jy\n100.0,0.030\n");
        let err = load_photometry_csv(&path).unwrap_err();
        assert!(matches!(err, MbbError::InvalidPhotometry(_)));
    }

    #[test]
    fn all_rows_invalid_is_an_input_error() {
        let (_dir, path) = write_csv("wavelength_um,flux_jy,flux_err_jy\n-100.0,0.030,0.003\n");
        let err = load_photometry_csv(&path).unwrap_err();
        assert!(matches!(err, MbbError::InvalidPhotometry(_)));
    }
}
