//! Normalization calibration.
//!
//! Finds the log-normalization `N` whose integrated 8–1000 µm luminosity
//! matches a requested `log10 L` target, by a secant-style correction on
//! `(N, log10 L)`.
//!
//! Precondition: luminosity is strictly increasing in `N` for fixed
//! `(T, β, z)`. Flux scales as `10^N`, so `log10 L` is in fact *linear* in
//! `N` with unit slope and the secant step converges in one or two
//! iterations. The iteration cap exists so that a violated precondition
//! fails loudly instead of looping forever.

use crate::cosmo::Cosmology;
use crate::domain::{MbbParams, ModelVariant};
use crate::error::MbbError;
use crate::luminosity::{self, CANONICAL_BAND_UM};

/// Hard iteration cap; exceeding it is a `CalibrationDiverged` error.
pub const MAX_ITER: usize = 10_000;

/// Convergence tolerance on `log10 L` [dex].
pub const TOL_DEX: f64 = 1e-4;

/// Fixed starting guess for the log-normalization.
pub const N_INIT: f64 = 11.0;

/// Calibrate the normalization for a target `log10 L` [L☉].
pub fn calibrate(
    variant: ModelVariant,
    target_log_l: f64,
    t: f64,
    beta: f64,
    z: f64,
    cosmo: &Cosmology,
) -> Result<f64, MbbError> {
    calibrate_capped(variant, target_log_l, t, beta, z, cosmo, MAX_ITER)
}

fn calibrate_capped(
    variant: ModelVariant,
    target_log_l: f64,
    t: f64,
    beta: f64,
    z: f64,
    cosmo: &Cosmology,
    max_iter: usize,
) -> Result<f64, MbbError> {
    if !target_log_l.is_finite() {
        return Err(MbbError::Config(format!(
            "target log10 L = {target_log_l} is not finite"
        )));
    }
    if !(t.is_finite() && t > 0.0) {
        return Err(MbbError::Config(format!("temperature {t} K must be > 0")));
    }
    if !beta.is_finite() {
        return Err(MbbError::Config(format!("emissivity index {beta} is not finite")));
    }
    if !(z.is_finite() && z > 0.0) {
        // D_L(0) = 0 makes every luminosity zero, so no normalization can
        // reach a finite target.
        return Err(MbbError::Config(format!(
            "redshift {z} must be > 0 for luminosity calibration"
        )));
    }

    let mut n = N_INIT;
    let mut prev: Option<(f64, f64)> = None;

    for _ in 0..max_iter {
        let lum =
            luminosity::integrate(variant, MbbParams::new(n, t, beta), z, CANONICAL_BAND_UM, cosmo)?;
        if !(lum.is_finite() && lum > 0.0) {
            return Err(MbbError::ModelEvaluation(format!(
                "non-positive luminosity {lum} during calibration (N={n}, T={t}, beta={beta}, z={z})"
            )));
        }
        let log_l = lum.log10();
        if (log_l - target_log_l).abs() <= TOL_DEX {
            return Ok(n);
        }

        // Secant slope from the previous iterate; unit slope on the first
        // pass (exact for this model's logarithmic normalization).
        let slope = match prev {
            Some((n_prev, log_prev)) if (n - n_prev).abs() > f64::EPSILON => {
                let s = (log_l - log_prev) / (n - n_prev);
                if s.is_finite() && s > 0.0 { s } else { 1.0 }
            }
            _ => 1.0,
        };
        prev = Some((n, log_l));
        n += (target_log_l - log_l) / slope;
    }

    Err(MbbError::CalibrationDiverged(format!(
        "no convergence to {target_log_l} within {max_iter} iterations (last N={n})"
    )))
}
