//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON alongside chains and curves
//! - reloaded later for summaries or comparisons

use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::MbbError;

/// Spectral form of the modified blackbody.
///
/// The variant is fixed at model construction and selected exactly once;
/// nothing downstream branches on the underlying booleans again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    /// Greybody in the τ ≪ 1 limit: `S_ν ∝ (ν/ν₀)^β B_ν(T)`.
    ///
    /// Cheaper than the general form and adequate longward of the peak, but
    /// slightly biased at short wavelengths where τ approaches unity.
    OpticallyThin,
    /// Optically-thin greybody with a mid-IR power-law excess below the
    /// blend wavelength.
    OpticallyThinPowerLaw,
    /// General-opacity greybody: `S_ν ∝ (1 − e^{−τ}) B_ν(T)`, valid for all τ.
    GeneralOpacity,
    /// General-opacity greybody with a mid-IR power-law excess.
    GeneralOpacityPowerLaw,
}

impl ModelVariant {
    /// Reconstruct a variant from the two legacy persistence flags.
    pub fn from_flags(opthin: bool, pl: bool) -> Self {
        match (opthin, pl) {
            (true, false) => ModelVariant::OpticallyThin,
            (true, true) => ModelVariant::OpticallyThinPowerLaw,
            (false, false) => ModelVariant::GeneralOpacity,
            (false, true) => ModelVariant::GeneralOpacityPowerLaw,
        }
    }

    /// Whether this variant uses the optically-thin limiting form.
    pub fn opthin(self) -> bool {
        matches!(
            self,
            ModelVariant::OpticallyThin | ModelVariant::OpticallyThinPowerLaw
        )
    }

    /// Whether this variant blends in a mid-IR power law.
    pub fn power_law(self) -> bool {
        matches!(
            self,
            ModelVariant::OpticallyThinPowerLaw | ModelVariant::GeneralOpacityPowerLaw
        )
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelVariant::OpticallyThin => "optically thin",
            ModelVariant::OpticallyThinPowerLaw => "optically thin + power law",
            ModelVariant::GeneralOpacity => "general opacity",
            ModelVariant::GeneralOpacityPowerLaw => "general opacity + power law",
        }
    }
}

/// MBB parameters: log10 normalization, dust temperature, emissivity index.
///
/// The normalization is logarithmic by construction (flux scales as `10^N`),
/// which makes the integrated log-luminosity linear in `n` with unit slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MbbParams {
    /// log10 of the flux normalization (dimensionless).
    pub n: f64,
    /// Dust temperature [K].
    pub t: f64,
    /// Emissivity index β.
    pub beta: f64,
}

impl MbbParams {
    pub fn new(n: f64, t: f64, beta: f64) -> Self {
        Self { n, t, beta }
    }
}

/// Validated photometry: aligned rest-frame wavelengths [µm], flux densities
/// [Jy] and flux uncertainties [Jy].
///
/// Construction filters out unusable points (non-positive wavelength,
/// negative flux, non-positive uncertainty) so the likelihood never has to
/// special-case them mid-computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Photometry {
    wavelength_um: Vec<f64>,
    flux_jy: Vec<f64>,
    flux_err_jy: Vec<f64>,
}

impl Photometry {
    /// Build a photometry set from three aligned sequences.
    ///
    /// Returns `InvalidPhotometry` if the lengths differ or if filtering
    /// leaves zero usable points.
    pub fn new(
        wavelength_um: &[f64],
        flux_jy: &[f64],
        flux_err_jy: &[f64],
    ) -> Result<Self, MbbError> {
        if wavelength_um.len() != flux_jy.len() || flux_jy.len() != flux_err_jy.len() {
            return Err(MbbError::InvalidPhotometry(format!(
                "mismatched sequence lengths: wavelength={}, flux={}, error={}",
                wavelength_um.len(),
                flux_jy.len(),
                flux_err_jy.len()
            )));
        }

        let mut wl = Vec::with_capacity(wavelength_um.len());
        let mut flux = Vec::with_capacity(flux_jy.len());
        let mut err = Vec::with_capacity(flux_err_jy.len());
        for i in 0..wavelength_um.len() {
            let (w, f, e) = (wavelength_um[i], flux_jy[i], flux_err_jy[i]);
            // Non-detections and malformed entries are dropped here, once,
            // rather than masked inside the likelihood.
            let usable =
                w.is_finite() && w > 0.0 && f.is_finite() && f >= 0.0 && e.is_finite() && e > 0.0;
            if usable {
                wl.push(w);
                flux.push(f);
                err.push(e);
            }
        }

        if wl.is_empty() {
            return Err(MbbError::InvalidPhotometry(
                "no usable points after filtering (need wavelength > 0, flux >= 0, error > 0)"
                    .to_string(),
            ));
        }

        Ok(Self {
            wavelength_um: wl,
            flux_jy: flux,
            flux_err_jy: err,
        })
    }

    pub fn len(&self) -> usize {
        self.wavelength_um.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength_um.is_empty()
    }

    /// Whether there are enough points to fit the emissivity index as a free
    /// parameter (three or more), on top of normalization and temperature.
    pub fn fits_beta(&self) -> bool {
        self.len() >= 3
    }

    pub fn wavelength_um(&self) -> &[f64] {
        &self.wavelength_um
    }

    pub fn flux_jy(&self) -> &[f64] {
        &self.flux_jy
    }

    pub fn flux_err_jy(&self) -> &[f64] {
        &self.flux_err_jy
    }
}

/// Sampler configuration.
///
/// All knobs are explicit here and passed into the fit entry point; there are
/// no process-wide tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Number of ensemble walkers (must be even and at least twice the
    /// parameter dimension).
    pub nwalkers: usize,
    /// Burn-in iterations, discarded before production.
    pub nburn: usize,
    /// Production iterations retained in the chain.
    pub niter: usize,
    /// Std-dev of the Gaussian jitter applied to the initial parameter
    /// vector when seeding walkers.
    pub jitter: f64,
    /// RNG seed; fixing it makes the whole run reproducible.
    pub seed: u64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            nwalkers: 180,
            nburn: 300,
            niter: 2000,
            jitter: 1e-7,
            seed: 42,
        }
    }
}

impl FitConfig {
    /// Validate against a parameter dimension, before any sampling starts.
    pub fn validate(&self, ndim: usize) -> Result<(), MbbError> {
        if self.nwalkers < 2 * ndim || self.nwalkers % 2 != 0 {
            return Err(MbbError::Config(format!(
                "nwalkers={} must be even and >= {} for a {ndim}-parameter fit",
                self.nwalkers,
                2 * ndim
            )));
        }
        if self.niter == 0 {
            return Err(MbbError::Config("niter must be > 0".to_string()));
        }
        if !(self.jitter.is_finite() && self.jitter > 0.0) {
            return Err(MbbError::Config(format!(
                "jitter={} must be finite and > 0",
                self.jitter
            )));
        }
        Ok(())
    }
}

/// Raw MCMC output.
///
/// Immutable once produced; consumed by the summarizer and the chain export.
#[derive(Debug, Clone)]
pub struct FitOutput {
    /// Flattened production chain, one row per (iteration, walker) draw.
    pub chain: DMatrix<f64>,
    /// Final walker positions, one row per walker.
    pub final_positions: DMatrix<f64>,
    /// Final log-posterior per walker.
    pub final_ln_prob: Vec<f64>,
    /// Parameter dimension (2 or 3).
    pub ndim: usize,
}

impl FitOutput {
    /// Chain column labels, in parameter order.
    pub fn labels(&self) -> Vec<&'static str> {
        if self.ndim == 3 {
            vec!["logN", "T", "beta"]
        } else {
            vec!["logN", "T"]
        }
    }
}

/// 16th/50th/84th percentile of one posterior marginal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CredibleInterval {
    pub p16: f64,
    pub p50: f64,
    pub p84: f64,
}

/// Point/interval estimates for every fitted dimension, in parameter order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSummary {
    pub per_dim: Vec<CredibleInterval>,
}

impl ChainSummary {
    /// Posterior medians in parameter order.
    pub fn medians(&self) -> Vec<f64> {
        self.per_dim.iter().map(|ci| ci.p50).collect()
    }
}

/// Posterior-predictive flux band over a wavelength grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveBand {
    pub wavelength_um: Vec<f64>,
    /// 50th percentile flux [Jy] at each wavelength.
    pub median_jy: Vec<f64>,
    /// 16th percentile flux [Jy].
    pub lower_jy: Vec<f64>,
    /// 84th percentile flux [Jy].
    pub upper_jy: Vec<f64>,
}

/// The six persisted scalars of a model state.
///
/// This mirrors the legacy tab-separated state file exactly; see `io::state`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// log10 of the 8–1000 µm luminosity [L☉].
    pub log_l: f64,
    /// Dust temperature [K].
    pub t: f64,
    /// Emissivity index.
    pub beta: f64,
    /// Source redshift.
    pub z: f64,
    /// Legacy optically-thin flag.
    pub opthin: bool,
    /// Legacy power-law flag.
    pub pl: bool,
}
