//! Flux-density evaluation for the four MBB variants.
//!
//! All variants share the parameter ordering `(N, T, β)` and the optical
//! depth `τ(ν) = (ν/ν₀)^β` with a fixed rest-frame pivot `ν₀ = c/λ₀`:
//!
//! - general opacity: `S_ν = 10^N (1 − e^{−τ}) B_ν(T)`
//! - optically thin:  `S_ν = 10^N τ B_ν(T)` (the τ ≪ 1 limit)
//! - power-law variants: below the blend wavelength the flux follows
//!   `A λ^α`, with `A` and `α` derived from value and first-derivative
//!   continuity with the greybody at the blend point. They are never free
//!   fit parameters.
//!
//! Numerical notes:
//! - `1 − e^{−τ}` and the Planck denominator use `exp_m1` forms so both the
//!   Rayleigh–Jeans and Wien limits stay accurate.
//! - Evaluation is a pure function of its arguments: no state, no I/O, safe
//!   to call from any number of worker threads.

use crate::cosmo::{C_M_S, H_PLANCK, JY_W_M2_HZ, K_B, UM_M};
use crate::domain::{MbbParams, ModelVariant};
use crate::error::MbbError;

/// Rest-frame opacity pivot wavelength [µm]; `τ(ν) = (ν/ν₀)^β` with
/// `ν₀ = c/λ₀`.
pub const PIVOT_WL_UM: f64 = 200.0;

/// Rest-frame blend wavelength [µm] below which the power-law variants hand
/// over from the greybody to the mid-IR power law.
pub const BLEND_WL_UM: f64 = 75.0;

/// Planck spectral radiance `B_ν(T)` [W m⁻² Hz⁻¹ sr⁻¹].
///
/// Returns NaN for non-physical inputs (`ν ≤ 0` or `T ≤ 0`) so misuse shows
/// up as a flux-evaluation failure instead of a plausible number.
pub fn planck_nu(nu_hz: f64, t_k: f64) -> f64 {
    if !(nu_hz > 0.0 && t_k > 0.0) {
        return f64::NAN;
    }
    let x = H_PLANCK * nu_hz / (K_B * t_k);
    // e^x − 1 overflows to +inf deep in the Wien tail, which correctly
    // drives the radiance to zero.
    let denom = x.exp_m1();
    2.0 * H_PLANCK * nu_hz * nu_hz * nu_hz / (C_M_S * C_M_S) / denom
}

/// Optical depth `τ(ν) = (ν/ν₀)^β` at a rest-frame wavelength [µm].
fn optical_depth(wl_rest_um: f64, beta: f64) -> f64 {
    // τ = (ν/ν₀)^β = (λ₀/λ)^β.
    (PIVOT_WL_UM / wl_rest_um).powf(beta)
}

/// Greybody flux density [Jy] at a rest-frame wavelength, before any
/// power-law blending.
fn greybody_jy(opthin: bool, params: MbbParams, wl_rest_um: f64) -> f64 {
    let nu = C_M_S / (wl_rest_um * UM_M);
    let tau = optical_depth(wl_rest_um, params.beta);
    // In the optically thin limit 1 − e^{−τ} → τ, so both forms share the
    // same normalization scale.
    let atten = if opthin { tau } else { -(-tau).exp_m1() };
    10f64.powf(params.n) * atten * planck_nu(nu, params.t) / JY_W_M2_HZ
}

/// Logarithmic slope `d ln S / d ln λ` of the greybody at a rest-frame
/// wavelength. This is the power-law exponent that makes the blend C¹.
fn greybody_log_slope(opthin: bool, t_k: f64, beta: f64, wl_rest_um: f64) -> f64 {
    let nu = C_M_S / (wl_rest_um * UM_M);
    let x = H_PLANCK * nu / (K_B * t_k);
    // d ln B_ν / d ln ν = 3 − x/(1 − e^{−x}).
    let planck_term = 3.0 - x / (-(-x).exp_m1());
    let tau = optical_depth(wl_rest_um, beta);
    // d ln(1 − e^{−τ}) / d ln ν = β τ / (e^τ − 1); β exactly when thin.
    let atten_term = if opthin { beta } else { beta * tau / tau.exp_m1() };
    // Flip sign for λ: d ln S / d ln λ = −d ln S / d ln ν.
    -(atten_term + planck_term)
}

/// Derived power-law segment: amplitude at the blend point and exponent.
///
/// `S(λ) = S_b (λ/λ_b)^α` for `λ < λ_b`, where `S_b` and `α` are the
/// greybody's value and log-slope at `λ_b`. Value and first derivative are
/// continuous at the blend by construction.
fn blend_segment(opthin: bool, params: MbbParams) -> (f64, f64) {
    let s_b = greybody_jy(opthin, params, BLEND_WL_UM);
    let alpha = greybody_log_slope(opthin, params.t, params.beta, BLEND_WL_UM);
    (s_b, alpha)
}

/// Flux density [Jy] at a single rest-frame wavelength [µm].
pub fn flux_rest_jy(variant: ModelVariant, params: MbbParams, wl_rest_um: f64) -> f64 {
    let opthin = variant.opthin();
    if variant.power_law() && wl_rest_um < BLEND_WL_UM {
        let (s_b, alpha) = blend_segment(opthin, params);
        s_b * (wl_rest_um / BLEND_WL_UM).powf(alpha)
    } else {
        greybody_jy(opthin, params, wl_rest_um)
    }
}

/// Evaluate observed-frame flux density [Jy] over a wavelength grid [µm].
///
/// Wavelengths are shifted to the rest frame internally (division by
/// `1 + z`); pass `z = 0` for rest-frame evaluation.
pub fn evaluate(
    variant: ModelVariant,
    params: MbbParams,
    wl_obs_um: &[f64],
    z: f64,
) -> Vec<f64> {
    let opthin = variant.opthin();
    let zp1 = 1.0 + z;
    // The blend constants depend only on (T, β); hoist them out of the loop
    // for power-law variants.
    let blend = if variant.power_law() {
        Some(blend_segment(opthin, params))
    } else {
        None
    };

    wl_obs_um
        .iter()
        .map(|&wl| {
            let wl_rest = wl / zp1;
            match blend {
                Some((s_b, alpha)) if wl_rest < BLEND_WL_UM => {
                    s_b * (wl_rest / BLEND_WL_UM).powf(alpha)
                }
                _ => greybody_jy(opthin, params, wl_rest),
            }
        })
        .collect()
}

/// Like [`evaluate`], but a non-finite output is reported as a
/// flux-evaluation failure instead of being passed along silently.
pub fn evaluate_checked(
    variant: ModelVariant,
    params: MbbParams,
    wl_obs_um: &[f64],
    z: f64,
) -> Result<Vec<f64>, MbbError> {
    let flux = evaluate(variant, params, wl_obs_um, z);
    if let Some(i) = flux.iter().position(|f| !f.is_finite()) {
        return Err(MbbError::ModelEvaluation(format!(
            "non-finite flux at wavelength {} um (N={}, T={} K, beta={}, z={z})",
            wl_obs_um[i], params.n, params.t, params.beta
        )));
    }
    Ok(flux)
}
