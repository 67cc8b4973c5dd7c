//! Command-line parsing for the MBB SED fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ModelVariant;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mbb", version, about = "Modified-blackbody SED fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit an MBB to photometry, print the posterior summary, and
    /// optionally save the state / export the chain.
    Fit(FitArgs),
    /// Print a saved model state and its integrated luminosity.
    Show(ShowArgs),
    /// Export model and posterior-predictive curves for external plotting.
    Curve(CurveArgs),
}

/// Options for `mbb fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Photometry CSV with columns: wavelength_um, flux_jy, flux_err_jy
    /// (rest-frame wavelengths).
    #[arg(long)]
    pub phot: PathBuf,

    /// Source redshift.
    #[arg(short, long)]
    pub z: f64,

    /// Initial target log10 luminosity [Lsun].
    #[arg(long, default_value_t = 12.0)]
    pub log_l: f64,

    /// Initial dust temperature [K].
    #[arg(long, default_value_t = 35.0)]
    pub temp: f64,

    /// Initial emissivity index.
    #[arg(long, default_value_t = 1.8)]
    pub beta: f64,

    /// Spectral variant.
    #[arg(long, value_enum, default_value_t = ModelVariant::GeneralOpacity)]
    pub variant: ModelVariant,

    /// Number of ensemble walkers (even, >= twice the parameter count).
    #[arg(long, default_value_t = 180)]
    pub walkers: usize,

    /// Burn-in iterations (discarded).
    #[arg(long, default_value_t = 300)]
    pub burn: usize,

    /// Production iterations (kept in the chain).
    #[arg(long, default_value_t = 2000)]
    pub steps: usize,

    /// Gaussian jitter applied to the initial walker positions.
    #[arg(long, default_value_t = 1e-7)]
    pub jitter: f64,

    /// RNG seed (fixing it reproduces the whole run).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write the fitted state file here.
    #[arg(long)]
    pub save_state: Option<PathBuf>,

    /// Export the flattened chain as JSON.
    #[arg(long)]
    pub export_chain: Option<PathBuf>,
}

/// Options for `mbb show`.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Saved state file to load (re-runs calibration).
    pub state: PathBuf,
}

/// Options for `mbb curve`.
#[derive(Debug, Parser, Clone)]
pub struct CurveArgs {
    /// Saved state file to load.
    pub state: PathBuf,

    /// Output curve JSON path.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Chain JSON from a previous fit; when present the curve carries a
    /// posterior-predictive band instead of the point-estimate curve alone.
    #[arg(long)]
    pub chain: Option<PathBuf>,

    /// Minimum rest-frame wavelength [um] of the export grid.
    #[arg(long, default_value_t = 10.0)]
    pub wl_min: f64,

    /// Maximum rest-frame wavelength [um] of the export grid.
    #[arg(long, default_value_t = 10000.0)]
    pub wl_max: f64,

    /// Number of (log-spaced) grid points.
    #[arg(long, default_value_t = 500)]
    pub points: usize,

    /// Posterior draws for the predictive band.
    #[arg(long, default_value_t = 200)]
    pub nsamples: usize,

    /// RNG seed for the predictive draws.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
