//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the model/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{ChainSummary, FitConfig, Photometry};
use crate::io::photometry::RowError;
use crate::mbb::ModifiedBlackbody;

/// Format the full fit summary: model state, sampler settings, and the
/// per-parameter credible intervals.
pub fn format_fit_summary(
    model: &ModifiedBlackbody,
    summary: &ChainSummary,
    phot: &Photometry,
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== mbb - Modified Blackbody Fit ===\n");
    out.push_str(&format!("Variant: {}\n", model.variant().display_name()));
    out.push_str(&format!("Redshift: z = {:.4}\n", model.z()));
    out.push_str(&format!(
        "Photometry: n={} | fitted dims={}\n",
        phot.len(),
        summary.per_dim.len()
    ));
    out.push_str(&format!(
        "Sampler: walkers={} | burn-in={} | production={} | seed={}\n",
        config.nwalkers, config.nburn, config.niter, config.seed
    ));

    out.push_str("\nPosterior (p50 [p16, p84]):\n");
    let labels = ["logN", "T [K]", "beta"];
    for (label, ci) in labels.iter().zip(summary.per_dim.iter()) {
        out.push_str(&format!(
            "- {label:<6} {:.4} [{:.4}, {:.4}]\n",
            ci.p50, ci.p16, ci.p84
        ));
    }
    if summary.per_dim.len() < 3 {
        out.push_str(&format!(
            "- beta   {:.4} (pinned; fewer than 3 points)\n",
            model.beta()
        ));
    }

    out.push_str("\nAdopted state:\n");
    out.push_str(&format_state_lines(model));
    out
}

/// Format a model state on its own (for `mbb show`).
pub fn format_state(model: &ModifiedBlackbody) -> String {
    let mut out = String::new();
    out.push_str("=== mbb - Model State ===\n");
    out.push_str(&format!("Variant: {}\n", model.variant().display_name()));
    out.push_str(&format!("Redshift: z = {:.4}\n", model.z()));
    out.push_str(&format_state_lines(model));
    out
}

fn format_state_lines(model: &ModifiedBlackbody) -> String {
    format!(
        "- T = {:.2} K | beta = {:.2} | logN = {:.4}\n- log10 L(8-1000um) = {:.4} Lsun\n",
        model.t(),
        model.beta(),
        model.n(),
        model.log_l()
    )
}

/// Format skipped-row diagnostics from CSV ingest.
pub fn format_row_errors(row_errors: &[RowError]) -> String {
    let mut out = String::new();
    for e in row_errors {
        out.push_str(&format!("  (skipped row {}) {}\n", e.line, e.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CredibleInterval, ModelVariant};

    #[test]
    fn fit_summary_mentions_all_parameters() {
        let model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let summary = ChainSummary {
            per_dim: vec![
                CredibleInterval { p16: -13.1, p50: -13.0, p84: -12.9 },
                CredibleInterval { p16: 33.0, p50: 35.0, p84: 37.0 },
                CredibleInterval { p16: 1.6, p50: 1.8, p84: 2.0 },
            ],
        };
        let phot = Photometry::new(
            &[100.0, 250.0, 500.0],
            &[0.03, 0.02, 0.004],
            &[0.003, 0.002, 0.0004],
        )
        .unwrap();
        let text = format_fit_summary(&model, &summary, &phot, &FitConfig::default());
        assert!(text.contains("logN"));
        assert!(text.contains("T [K]"));
        assert!(text.contains("beta"));
        assert!(text.contains("log10 L"));
    }

    #[test]
    fn pinned_beta_is_reported() {
        let model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let summary = ChainSummary {
            per_dim: vec![
                CredibleInterval { p16: -13.1, p50: -13.0, p84: -12.9 },
                CredibleInterval { p16: 33.0, p50: 35.0, p84: 37.0 },
            ],
        };
        let phot = Photometry::new(&[100.0, 250.0], &[0.03, 0.02], &[0.003, 0.002]).unwrap();
        let text = format_fit_summary(&model, &summary, &phot, &FitConfig::default());
        assert!(text.contains("pinned"));
    }
}
