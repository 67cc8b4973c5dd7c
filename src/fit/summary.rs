//! Chain summarization: marginal percentiles and predictive bands.

use rand::Rng;

use crate::domain::{
    ChainSummary, CredibleInterval, FitOutput, ModelVariant, PredictiveBand,
};
use crate::error::MbbError;
use crate::fit::posterior::theta_params;
use crate::math::percentile_sorted;
use crate::models;

/// Reduce a chain to 16th/50th/84th percentiles per dimension.
pub fn summarize(output: &FitOutput) -> Result<ChainSummary, MbbError> {
    let chain = &output.chain;
    if chain.nrows() == 0 {
        return Err(MbbError::Data("empty sample chain".to_string()));
    }

    let mut per_dim = Vec::with_capacity(chain.ncols());
    for d in 0..chain.ncols() {
        let mut col: Vec<f64> = chain.column(d).iter().copied().collect();
        col.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        per_dim.push(CredibleInterval {
            p16: percentile_sorted(&col, 16.0),
            p50: percentile_sorted(&col, 50.0),
            p84: percentile_sorted(&col, 84.0),
        });
    }
    Ok(ChainSummary { per_dim })
}

/// Posterior-predictive flux band over a rest-frame wavelength grid.
///
/// Draws `nsamples` rows uniformly at random (with replacement) from the
/// chain, evaluates the spectral model for each draw, and returns the
/// 16/50/84th percentile flux at every wavelength across draws.
pub fn predictive_band<R: Rng>(
    output: &FitOutput,
    variant: ModelVariant,
    fixed_beta: f64,
    wl_um: &[f64],
    nsamples: usize,
    rng: &mut R,
) -> Result<PredictiveBand, MbbError> {
    if output.chain.nrows() == 0 {
        return Err(MbbError::Data("empty sample chain".to_string()));
    }
    if wl_um.is_empty() {
        return Err(MbbError::Config("empty wavelength grid".to_string()));
    }
    if nsamples == 0 {
        return Err(MbbError::Config("nsamples must be > 0".to_string()));
    }

    let nrows = output.chain.nrows();
    let mut curves = Vec::with_capacity(nsamples);
    for _ in 0..nsamples {
        let row = rng.gen_range(0..nrows);
        let theta: Vec<f64> = output.chain.row(row).iter().copied().collect();
        let params = theta_params(&theta, fixed_beta);
        curves.push(models::evaluate(variant, params, wl_um, 0.0));
    }

    let mut median_jy = Vec::with_capacity(wl_um.len());
    let mut lower_jy = Vec::with_capacity(wl_um.len());
    let mut upper_jy = Vec::with_capacity(wl_um.len());
    let mut column = vec![0.0; nsamples];
    for (w, _) in wl_um.iter().enumerate() {
        for (s, curve) in curves.iter().enumerate() {
            column[s] = curve[w];
        }
        column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        lower_jy.push(percentile_sorted(&column, 16.0));
        median_jy.push(percentile_sorted(&column, 50.0));
        upper_jy.push(percentile_sorted(&column, 84.0));
    }

    Ok(PredictiveBand {
        wavelength_um: wl_um.to_vec(),
        median_jy,
        lower_jy,
        upper_jy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn constant_chain(rows: usize, theta: &[f64]) -> FitOutput {
        let data: Vec<f64> = theta.iter().copied().cycle().take(rows * theta.len()).collect();
        FitOutput {
            chain: DMatrix::from_row_slice(rows, theta.len(), &data),
            final_positions: DMatrix::from_row_slice(1, theta.len(), theta),
            final_ln_prob: vec![0.0],
            ndim: theta.len(),
        }
    }

    #[test]
    fn summarize_known_percentiles() {
        // Column 0 runs 1..=100; the interpolated percentiles are known.
        let rows = 100;
        let data: Vec<f64> = (1..=rows).flat_map(|i| [i as f64, 50.0]).collect();
        let output = FitOutput {
            chain: DMatrix::from_row_slice(rows, 2, &data),
            final_positions: DMatrix::from_row_slice(1, 2, &[0.0, 0.0]),
            final_ln_prob: vec![0.0],
            ndim: 2,
        };
        let summary = summarize(&output).unwrap();
        let ci = summary.per_dim[0];
        assert!((ci.p50 - 50.5).abs() < 1e-9);
        assert!((ci.p16 - 16.84).abs() < 1e-9);
        assert!((ci.p84 - 84.16).abs() < 1e-9);
        assert_eq!(summary.per_dim[1].p50, 50.0);
        assert!(ci.p16 <= ci.p50 && ci.p50 <= ci.p84);
    }

    #[test]
    fn summarize_rejects_empty_chain() {
        let output = FitOutput {
            chain: DMatrix::zeros(0, 3),
            final_positions: DMatrix::zeros(0, 3),
            final_ln_prob: vec![],
            ndim: 3,
        };
        assert!(matches!(summarize(&output), Err(MbbError::Data(_))));
    }

    #[test]
    fn degenerate_chain_gives_zero_width_band() {
        let theta = [-13.0, 35.0, 1.8];
        let output = constant_chain(50, &theta);
        let mut rng = StdRng::seed_from_u64(3);
        let wl = [60.0, 100.0, 250.0];
        let band = predictive_band(
            &output,
            ModelVariant::GeneralOpacity,
            1.8,
            &wl,
            40,
            &mut rng,
        )
        .unwrap();
        for i in 0..wl.len() {
            assert_eq!(band.lower_jy[i], band.median_jy[i]);
            assert_eq!(band.median_jy[i], band.upper_jy[i]);
            assert!(band.median_jy[i] > 0.0);
        }
    }

    #[test]
    fn band_percentiles_are_ordered() {
        // Two-point chain with distinct normalizations: the band must
        // bracket the dimmer and brighter curves in order.
        let rows = 40;
        let data: Vec<f64> = (0..rows)
            .flat_map(|i| {
                if i % 2 == 0 {
                    [-13.2, 35.0, 1.8]
                } else {
                    [-12.8, 35.0, 1.8]
                }
            })
            .collect();
        let output = FitOutput {
            chain: DMatrix::from_row_slice(rows, 3, &data),
            final_positions: DMatrix::from_row_slice(1, 3, &[-13.0, 35.0, 1.8]),
            final_ln_prob: vec![0.0],
            ndim: 3,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let wl = [100.0, 250.0];
        let band = predictive_band(
            &output,
            ModelVariant::GeneralOpacity,
            1.8,
            &wl,
            100,
            &mut rng,
        )
        .unwrap();
        for i in 0..wl.len() {
            assert!(band.lower_jy[i] <= band.median_jy[i]);
            assert!(band.median_jy[i] <= band.upper_jy[i]);
            assert!(band.lower_jy[i] < band.upper_jy[i]);
        }
    }
}
