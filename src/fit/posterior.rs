//! Log-posterior over the MBB parameters.
//!
//! The parameter vector `theta` is `[N, T]` or `[N, T, β]`; when β is not
//! part of the fit it is pinned to the model's current value. The prior is a
//! flat box with *strict* inequalities (boundary values are rejected) and
//! the likelihood is the usual Gaussian χ².
//!
//! Because the spectral model is the expensive path, the posterior
//! short-circuits: the likelihood is never evaluated when the prior is −∞.

use crate::domain::{MbbParams, ModelVariant, Photometry};
use crate::models;

/// Open temperature prior interval [K].
pub const T_PRIOR_K: (f64, f64) = (10.0, 100.0);

/// Open emissivity-index prior interval.
pub const BETA_PRIOR: (f64, f64) = (0.1, 5.0);

/// Expand a sampled `theta` into full model parameters.
pub fn theta_params(theta: &[f64], fixed_beta: f64) -> MbbParams {
    let beta = theta.get(2).copied().unwrap_or(fixed_beta);
    MbbParams::new(theta[0], theta[1], beta)
}

/// The posterior density for one fit: fixed variant, photometry and pinned β.
///
/// Holds only shared references and plain values, so one instance can be
/// evaluated from many worker threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Posterior<'a> {
    pub variant: ModelVariant,
    pub phot: &'a Photometry,
    /// β used when the emissivity index is not part of `theta`.
    pub fixed_beta: f64,
}

impl Posterior<'_> {
    /// Log-prior: 0 inside the open box, −∞ outside (including exactly on
    /// the boundary).
    pub fn ln_prior(&self, theta: &[f64]) -> f64 {
        let t = theta[1];
        if !(t > T_PRIOR_K.0 && t < T_PRIOR_K.1) {
            return f64::NEG_INFINITY;
        }
        if let Some(&beta) = theta.get(2) {
            if !(beta > BETA_PRIOR.0 && beta < BETA_PRIOR.1) {
                return f64::NEG_INFINITY;
            }
        }
        0.0
    }

    /// Gaussian log-likelihood: `−χ²/2` over the photometry, evaluated in
    /// the rest frame. A non-finite χ² degrades to −∞ so the sampler stays
    /// well-defined.
    pub fn ln_likelihood(&self, theta: &[f64]) -> f64 {
        let params = theta_params(theta, self.fixed_beta);
        let model = models::evaluate(self.variant, params, self.phot.wavelength_um(), 0.0);

        let mut chi2 = 0.0;
        for i in 0..model.len() {
            let r = (self.phot.flux_jy()[i] - model[i]) / self.phot.flux_err_jy()[i];
            chi2 += r * r;
        }

        let ln_like = -0.5 * chi2;
        if ln_like.is_nan() {
            return f64::NEG_INFINITY;
        }
        ln_like
    }

    /// Log-posterior: prior + likelihood, with the likelihood skipped
    /// entirely when the prior already rejects.
    pub fn ln_prob(&self, theta: &[f64]) -> f64 {
        let lp = self.ln_prior(theta);
        if !lp.is_finite() {
            return f64::NEG_INFINITY;
        }
        lp + self.ln_likelihood(theta)
    }
}
