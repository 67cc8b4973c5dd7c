//! Affine-invariant ensemble sampler (Goodman–Weare stretch move).
//!
//! The ensemble is split into two half-sets; each half proposes moves
//! against the other, which keeps detailed balance while allowing every
//! proposal in a half to be evaluated concurrently. Posterior evaluations
//! (the expensive part) are dispatched to the rayon worker pool; all random
//! draws happen on the driver thread, so a fixed seed reproduces the run
//! bit-for-bit regardless of pool size.
//!
//! There is no checkpointing: an interrupted run loses its chain state.

use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;

use crate::domain::{FitConfig, FitOutput};
use crate::error::MbbError;
use crate::fit::posterior::Posterior;

/// Stretch-move scale parameter `a`; 2.0 is the standard choice.
const STRETCH_A: f64 = 2.0;

/// Run burn-in then production sampling from a jittered initial point.
///
/// `init` is the `[N, T]` or `[N, T, β]` starting vector; each walker starts
/// at `init` plus independent Gaussian jitter. Burn-in history is discarded;
/// production draws from all walkers are concatenated into the flattened
/// chain in iteration-major order.
pub fn run_ensemble(
    posterior: &Posterior<'_>,
    init: &[f64],
    config: &FitConfig,
) -> Result<FitOutput, MbbError> {
    let ndim = init.len();
    if !(2..=3).contains(&ndim) {
        return Err(MbbError::Config(format!(
            "parameter dimension {ndim} unsupported (expected 2 or 3)"
        )));
    }
    config.validate(ndim)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = Normal::new(0.0, config.jitter)
        .map_err(|e| MbbError::Config(format!("jitter distribution error: {e}")))?;

    let mut pos: Vec<Vec<f64>> = (0..config.nwalkers)
        .map(|_| init.iter().map(|&v| v + jitter.sample(&mut rng)).collect())
        .collect();
    let mut ln_prob: Vec<f64> = pos.par_iter().map(|theta| posterior.ln_prob(theta)).collect();

    for _ in 0..config.nburn {
        step(posterior, &mut pos, &mut ln_prob, &mut rng);
    }

    let mut chain = Vec::with_capacity(config.niter * config.nwalkers * ndim);
    for _ in 0..config.niter {
        step(posterior, &mut pos, &mut ln_prob, &mut rng);
        for walker in &pos {
            chain.extend_from_slice(walker);
        }
    }

    let final_positions = DMatrix::from_row_slice(config.nwalkers, ndim, &pos.concat());
    let chain = DMatrix::from_row_slice(config.niter * config.nwalkers, ndim, &chain);
    Ok(FitOutput {
        chain,
        final_positions,
        final_ln_prob: ln_prob,
        ndim,
    })
}

/// One full ensemble update: move the first half against the second, then
/// the second against the (already updated) first.
fn step(
    posterior: &Posterior<'_>,
    pos: &mut [Vec<f64>],
    ln_prob: &mut [f64],
    rng: &mut StdRng,
) {
    let n = pos.len();
    let half = n / 2;
    move_half(posterior, pos, ln_prob, rng, 0, half, n);
    move_half(posterior, pos, ln_prob, rng, half, 0, half);
}

/// Stretch-move update for walkers `[active_start, active_start + count)`
/// against partners drawn from `[other_start, other_end)`.
fn move_half(
    posterior: &Posterior<'_>,
    pos: &mut [Vec<f64>],
    ln_prob: &mut [f64],
    rng: &mut StdRng,
    active_start: usize,
    other_start: usize,
    other_end: usize,
) {
    let half = pos.len() / 2;
    let ndim = pos[0].len();

    // Draw everything serially first so parallel evaluation stays
    // deterministic for a given seed.
    let mut proposals = Vec::with_capacity(half);
    let mut stretch = Vec::with_capacity(half);
    let mut accept_u = Vec::with_capacity(half);
    for k in 0..half {
        let i = active_start + k;
        let j = rng.gen_range(other_start..other_end);
        let z = stretch_z(rng);
        let proposal: Vec<f64> = (0..ndim)
            .map(|d| pos[j][d] + z * (pos[i][d] - pos[j][d]))
            .collect();
        proposals.push(proposal);
        stretch.push(z);
        accept_u.push(rng.r#gen::<f64>());
    }

    let ln_prob_new: Vec<f64> = proposals
        .par_iter()
        .map(|theta| posterior.ln_prob(theta))
        .collect();

    for k in 0..half {
        let i = active_start + k;
        let ln_accept =
            (ndim as f64 - 1.0) * stretch[k].ln() + ln_prob_new[k] - ln_prob[i];
        if accept_u[k].ln() < ln_accept {
            pos[i] = proposals[k].clone();
            ln_prob[i] = ln_prob_new[k];
        }
    }
}

/// Draw from the stretch distribution `g(z) ∝ 1/√z` on `[1/a, a]`.
fn stretch_z(rng: &mut StdRng) -> f64 {
    let u: f64 = rng.r#gen();
    let s = (STRETCH_A - 1.0) * u + 1.0;
    s * s / STRETCH_A
}
