//! Chain and predictive-curve JSON exports.
//!
//! The chain file is the "portable" representation of a completed fit:
//! the flattened sample chain with its dimension labels, the final walker
//! positions/log-probabilities, and enough run metadata to re-evaluate the
//! model for any draw. Together with the scalar state file this persists
//! the full fit; resuming *sampling* from a reloaded chain is future work,
//! since that would also require restoring the RNG stream.

use std::fs::File;
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::domain::{FitOutput, ModelVariant, PredictiveBand};
use crate::error::MbbError;
use crate::mbb::ModifiedBlackbody;

/// Serialized fit chain + metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainFile {
    pub tool: String,
    pub variant: ModelVariant,
    pub redshift: f64,
    /// β pinned during 2-parameter fits; needed to re-evaluate draws.
    pub fixed_beta: f64,
    pub labels: Vec<String>,
    /// Flattened chain, one row per draw.
    pub chain: Vec<Vec<f64>>,
    pub final_positions: Vec<Vec<f64>>,
    pub final_ln_prob: Vec<f64>,
}

impl ChainFile {
    /// Rebuild the in-memory fit output (e.g. for predictive bands).
    pub fn to_output(&self) -> Result<FitOutput, MbbError> {
        let ndim = self.labels.len();
        if ndim == 0 || self.chain.is_empty() {
            return Err(MbbError::Data("chain file has no samples".to_string()));
        }
        if self.chain.iter().any(|row| row.len() != ndim) {
            return Err(MbbError::Data(format!(
                "chain rows do not all have {ndim} columns"
            )));
        }
        if self.final_positions.iter().any(|row| row.len() != ndim) {
            return Err(MbbError::Data(format!(
                "final positions do not all have {ndim} columns"
            )));
        }

        let flat: Vec<f64> = self.chain.iter().flatten().copied().collect();
        let final_flat: Vec<f64> = self.final_positions.iter().flatten().copied().collect();
        Ok(FitOutput {
            chain: DMatrix::from_row_slice(self.chain.len(), ndim, &flat),
            final_positions: DMatrix::from_row_slice(
                self.final_positions.len(),
                ndim,
                &final_flat,
            ),
            final_ln_prob: self.final_ln_prob.clone(),
            ndim,
        })
    }
}

/// Build a chain file from a fitted model.
///
/// Fails if the model has not been fit yet.
pub fn chain_file(model: &ModifiedBlackbody) -> Result<ChainFile, MbbError> {
    let output = model.fit_output().ok_or_else(|| {
        MbbError::Config("no fit has been run; nothing to export".to_string())
    })?;

    let chain = (0..output.chain.nrows())
        .map(|r| output.chain.row(r).iter().copied().collect())
        .collect();
    let final_positions = (0..output.final_positions.nrows())
        .map(|r| output.final_positions.row(r).iter().copied().collect())
        .collect();

    Ok(ChainFile {
        tool: "mbb".to_string(),
        variant: model.variant(),
        redshift: model.z(),
        fixed_beta: model.beta(),
        labels: output.labels().iter().map(|s| s.to_string()).collect(),
        chain,
        final_positions,
        final_ln_prob: output.final_ln_prob.clone(),
    })
}

/// Write a fitted model's chain as JSON.
pub fn write_chain_json(path: &Path, model: &ModifiedBlackbody) -> Result<(), MbbError> {
    let contents = chain_file(model)?;
    let file = File::create(path).map_err(|e| {
        MbbError::Io(format!("failed to create chain JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, &contents)
        .map_err(|e| MbbError::Io(format!("failed to write chain JSON: {e}")))
}

/// Read a chain JSON file.
pub fn read_chain_json(path: &Path) -> Result<ChainFile, MbbError> {
    let file = File::open(path).map_err(|e| {
        MbbError::Io(format!("failed to open chain JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file).map_err(|e| MbbError::Data(format!("invalid chain JSON: {e}")))
}

/// Serialized model/posterior-predictive curves for external plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub variant: ModelVariant,
    pub redshift: f64,
    pub temperature_k: f64,
    pub beta: f64,
    pub log_l: f64,
    pub band: PredictiveBand,
}

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    model: &ModifiedBlackbody,
    band: PredictiveBand,
) -> Result<(), MbbError> {
    let curve = CurveFile {
        tool: "mbb".to_string(),
        variant: model.variant(),
        redshift: model.z(),
        temperature_k: model.t(),
        beta: model.beta(),
        log_l: model.log_l(),
        band,
    };
    let file = File::create(path).map_err(|e| {
        MbbError::Io(format!("failed to create curve JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| MbbError::Io(format!("failed to write curve JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitConfig;

    fn fitted_model() -> ModifiedBlackbody {
        let mut model = ModifiedBlackbody::new(
            12.0,
            35.0,
            1.8,
            2.0,
            ModelVariant::GeneralOpacity,
        )
        .unwrap();
        let wl = [60.0, 110.0, 250.0, 500.0];
        let phot = crate::data::generate_photometry(&model, &wl, 10.0, 21).unwrap();
        let config = FitConfig {
            nwalkers: 8,
            nburn: 10,
            niter: 20,
            jitter: 1e-4,
            seed: 17,
        };
        model.fit(&phot, &config).unwrap();
        model
    }

    #[test]
    fn chain_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let model = fitted_model();
        write_chain_json(&path, &model).unwrap();
        let loaded = read_chain_json(&path).unwrap();

        assert_eq!(loaded.tool, "mbb");
        assert_eq!(loaded.variant, model.variant());
        assert_eq!(loaded.labels, vec!["logN", "T", "beta"]);

        let rebuilt = loaded.to_output().unwrap();
        let original = model.fit_output().unwrap();
        assert_eq!(rebuilt.chain, original.chain);
        assert_eq!(rebuilt.final_ln_prob, original.final_ln_prob);
    }

    #[test]
    fn export_without_fit_is_an_error() {
        let model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        assert!(chain_file(&model).is_err());
    }

    #[test]
    fn to_output_rejects_ragged_chains() {
        let mut file = chain_file(&fitted_model()).unwrap();
        file.chain[0].pop();
        assert!(matches!(file.to_output(), Err(MbbError::Data(_))));
    }
}
