//! Crate-wide error type.
//!
//! Every failure surfaced to callers is one of a small set of kinds, each
//! mapping to an exit code so the `mbb` binary can translate errors into
//! process status directly:
//!
//! - 2: configuration / input problems (bad flags, bad files, bad photometry)
//! - 3: data problems (malformed state files, empty chains)
//! - 4: numeric failures (calibration divergence, non-finite model output)
//!
//! Prior rejection during sampling is *not* an error: it is a −∞ posterior
//! consumed inside the sampler loop and never reaches this type.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MbbError {
    /// Photometry that cannot be fit: mismatched sequence lengths, or no
    /// usable points left after filtering invalid wavelengths/fluxes/errors.
    #[error("invalid photometry: {0}")]
    InvalidPhotometry(String),

    /// Invalid run configuration (walker counts, iteration counts, bounds).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// File open/read/write failures for state files, CSVs, and exports.
    #[error("{0}")]
    Io(String),

    /// A state or chain file that opened fine but does not parse.
    #[error("invalid data: {0}")]
    Data(String),

    /// The normalization calibrator exceeded its iteration cap.
    #[error("calibration did not converge: {0}")]
    CalibrationDiverged(String),

    /// The spectral model produced non-finite flux for in-range parameters.
    #[error("model evaluation failed: {0}")]
    ModelEvaluation(String),
}

impl MbbError {
    pub fn exit_code(&self) -> u8 {
        match self {
            MbbError::InvalidPhotometry(_) | MbbError::Config(_) | MbbError::Io(_) => 2,
            MbbError::Data(_) => 3,
            MbbError::CalibrationDiverged(_) | MbbError::ModelEvaluation(_) => 4,
        }
    }
}
