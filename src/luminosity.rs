//! Bolometric luminosity integration.
//!
//! Converts a spectral model into an integrated luminosity over a rest-frame
//! wavelength band (canonically 8–1000 µm):
//!
//! - wavelength bounds become frequency bounds via the speed of light
//! - the model is evaluated on a fixed 20,000-point linear frequency grid
//! - flux × bin-width is summed with a left-endpoint rule and scaled by
//!   `4π D_L² / (1+z)`
//!
//! The fixed grid makes the result deterministic for identical inputs; there
//! is no adaptive refinement and no randomness anywhere in this path.

use std::f64::consts::PI;

use crate::cosmo::{C_M_S, Cosmology, JY_W_M2_HZ, L_SUN_W, UM_M};
use crate::domain::{MbbParams, ModelVariant};
use crate::error::MbbError;
use crate::math::linspace;
use crate::models;

/// Canonical infrared band [µm] for bolometric luminosities.
pub const CANONICAL_BAND_UM: (f64, f64) = (8.0, 1000.0);

/// Frequency grid resolution for the Riemann sum.
pub const FREQ_GRID_POINTS: usize = 20_000;

/// Integrate the spectral model to a luminosity [L☉].
///
/// `bounds_um` must satisfy `bounds_um.0 < bounds_um.1`; anything else is a
/// contract violation reported as a configuration error. The model is
/// evaluated in the rest frame; the redshift enters only through the
/// luminosity distance and the `1/(1+z)` bandwidth compression.
pub fn integrate(
    variant: ModelVariant,
    params: MbbParams,
    z: f64,
    bounds_um: (f64, f64),
    cosmo: &Cosmology,
) -> Result<f64, MbbError> {
    let (wl_lo, wl_hi) = bounds_um;
    if !(wl_lo.is_finite() && wl_hi.is_finite() && wl_lo > 0.0 && wl_lo < wl_hi) {
        return Err(MbbError::Config(format!(
            "invalid wavelength bounds ({wl_lo}, {wl_hi}) um: need 0 < low < high"
        )));
    }
    if !(z.is_finite() && z >= 0.0) {
        return Err(MbbError::Config(format!("invalid redshift {z}")));
    }

    // Short wavelength -> high frequency: the grid ascends in frequency.
    let nu_lo = C_M_S / (wl_hi * UM_M);
    let nu_hi = C_M_S / (wl_lo * UM_M);
    let nu = linspace(nu_lo, nu_hi, FREQ_GRID_POINTS)?;

    // Left endpoints only; the last grid frequency bounds the final bin.
    let wl_um: Vec<f64> = nu[..nu.len() - 1]
        .iter()
        .map(|&f| C_M_S / f / UM_M)
        .collect();
    let flux_jy = models::evaluate_checked(variant, params, &wl_um, 0.0)?;

    let mut flux_sum_w_m2 = 0.0;
    for (i, &s) in flux_jy.iter().enumerate() {
        flux_sum_w_m2 += s * JY_W_M2_HZ * (nu[i + 1] - nu[i]);
    }

    let dl_m = cosmo.luminosity_distance_m(z);
    let lum_w = 4.0 * PI * dl_m * dl_m * flux_sum_w_m2 / (1.0 + z);
    Ok(lum_w / L_SUN_W)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MbbParams {
        MbbParams::new(-13.0, 35.0, 1.8)
    }

    #[test]
    fn integration_is_deterministic() {
        let cosmo = Cosmology::default();
        let a = integrate(ModelVariant::GeneralOpacity, params(), 2.0, CANONICAL_BAND_UM, &cosmo)
            .unwrap();
        let b = integrate(ModelVariant::GeneralOpacity, params(), 2.0, CANONICAL_BAND_UM, &cosmo)
            .unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn luminosity_is_strictly_increasing_in_normalization() {
        let cosmo = Cosmology::default();
        let mut prev = 0.0;
        for i in 0..8 {
            let p = MbbParams::new(-15.0 + i as f64, 35.0, 1.8);
            let l = integrate(ModelVariant::GeneralOpacity, p, 2.0, CANONICAL_BAND_UM, &cosmo)
                .unwrap();
            assert!(l > prev, "L not increasing at N={}", p.n);
            prev = l;
        }
    }

    #[test]
    fn log_luminosity_is_linear_in_normalization() {
        // Flux scales as 10^N, so each unit of N is exactly one dex of L.
        let cosmo = Cosmology::default();
        let l0 = integrate(
            ModelVariant::OpticallyThin,
            MbbParams::new(-13.0, 35.0, 1.8),
            2.0,
            CANONICAL_BAND_UM,
            &cosmo,
        )
        .unwrap();
        let l1 = integrate(
            ModelVariant::OpticallyThin,
            MbbParams::new(-12.0, 35.0, 1.8),
            2.0,
            CANONICAL_BAND_UM,
            &cosmo,
        )
        .unwrap();
        assert!((l1.log10() - l0.log10() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let cosmo = Cosmology::default();
        let err =
            integrate(ModelVariant::GeneralOpacity, params(), 2.0, (1000.0, 8.0), &cosmo)
                .unwrap_err();
        assert!(matches!(err, MbbError::Config(_)));
    }

    #[test]
    fn zero_redshift_has_zero_distance_and_luminosity() {
        let cosmo = Cosmology::default();
        let l = integrate(ModelVariant::GeneralOpacity, params(), 0.0, CANONICAL_BAND_UM, &cosmo)
            .unwrap();
        assert_eq!(l, 0.0);
    }
}
