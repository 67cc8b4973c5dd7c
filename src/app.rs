//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - ingests photometry
//! - runs calibration + the MCMC fit
//! - prints reports
//! - writes optional state/chain/curve exports

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{Cli, Command, CurveArgs, FitArgs, ShowArgs};
use crate::domain::{FitConfig, PredictiveBand};
use crate::error::MbbError;
use crate::fit::summary;
use crate::math::log_space;

pub mod pipeline;

/// Entry point for the `mbb` binary.
pub fn run() -> Result<(), MbbError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Show(args) => handle_show(args),
        Command::Curve(args) => handle_curve(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), MbbError> {
    let (phot, row_errors) = crate::io::load_photometry_csv(&args.phot)?;
    if !row_errors.is_empty() {
        eprint!("{}", crate::report::format_row_errors(&row_errors));
    }

    let request = pipeline::FitRequest {
        target_log_l: args.log_l,
        t: args.temp,
        beta: args.beta,
        z: args.z,
        variant: args.variant,
    };
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&phot, &request, &config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.model, &run.summary, &phot, &config)
    );

    if let Some(path) = &args.save_state {
        crate::io::write_state(path, &run.model.state_record())?;
    }
    if let Some(path) = &args.export_chain {
        crate::io::write_chain_json(path, &run.model)?;
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), MbbError> {
    let model = crate::io::load_model(&args.state)?;
    println!("{}", crate::report::format_state(&model));
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), MbbError> {
    let model = crate::io::load_model(&args.state)?;
    let grid = log_space(args.wl_min, args.wl_max, args.points)?;

    let band = match &args.chain {
        Some(chain_path) => {
            let chain = crate::io::read_chain_json(chain_path)?;
            let output = chain.to_output()?;
            let mut rng = StdRng::seed_from_u64(args.seed);
            summary::predictive_band(
                &output,
                chain.variant,
                chain.fixed_beta,
                &grid,
                args.nsamples,
                &mut rng,
            )?
        }
        None => {
            // Point-estimate curve: a zero-width band around the current state.
            let flux = model.eval(&grid, 0.0)?;
            PredictiveBand {
                wavelength_um: grid,
                median_jy: flux.clone(),
                lower_jy: flux.clone(),
                upper_jy: flux,
            }
        }
    };

    crate::io::write_curve_json(&args.out, &model, band)?;
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        nwalkers: args.walkers,
        nburn: args.burn,
        niter: args.steps,
        jitter: args.jitter,
        seed: args.seed,
    }
}
