//! Live modified-blackbody model state.
//!
//! A `ModifiedBlackbody` owns the current best-estimate parameters
//! `(N, T, β)`, the fixed redshift and variant, and the derived 8–1000 µm
//! log-luminosity. The invariant maintained by every mutation path is:
//!
//! > `log_l` equals the integrated luminosity of the current parameters
//! > over the canonical band, to within calibration tolerance.
//!
//! Construction calibrates `N` against a *target* luminosity; `fit`
//! replaces the parameters with posterior medians; `update`/`update_l`
//! assign directly or re-calibrate. Each of these restores the invariant
//! before returning, or fails without partial mutation.
//!
//! One instance must only be mutated by one logical fit operation at a
//! time; the pure evaluation/integration layers underneath are freely
//! shareable across threads.

use rand::Rng;

use crate::cosmo::Cosmology;
use crate::domain::{
    ChainSummary, FitConfig, FitOutput, MbbParams, ModelVariant, Photometry, PredictiveBand,
    StateRecord,
};
use crate::error::MbbError;
use crate::fit::{calibrate, run_ensemble, summarize, Posterior};
use crate::fit::summary;
use crate::luminosity::{self, CANONICAL_BAND_UM};
use crate::models;

#[derive(Debug, Clone)]
pub struct ModifiedBlackbody {
    variant: ModelVariant,
    n: f64,
    t: f64,
    beta: f64,
    z: f64,
    /// log10 of the canonical-band luminosity [L☉]; kept in lock-step with
    /// the parameters above.
    log_l: f64,
    cosmo: Cosmology,
    fit_output: Option<FitOutput>,
}

impl ModifiedBlackbody {
    /// Create a model whose integrated luminosity matches `target_log_l`
    /// [log10 L☉] at the given temperature, emissivity index and redshift,
    /// using the default cosmology.
    pub fn new(
        target_log_l: f64,
        t: f64,
        beta: f64,
        z: f64,
        variant: ModelVariant,
    ) -> Result<Self, MbbError> {
        Self::with_cosmology(target_log_l, t, beta, z, variant, Cosmology::default())
    }

    /// Like [`ModifiedBlackbody::new`] with an explicit cosmology.
    pub fn with_cosmology(
        target_log_l: f64,
        t: f64,
        beta: f64,
        z: f64,
        variant: ModelVariant,
        cosmo: Cosmology,
    ) -> Result<Self, MbbError> {
        let n = calibrate(variant, target_log_l, t, beta, z, &cosmo)?;
        let mut model = Self {
            variant,
            n,
            t,
            beta,
            z,
            log_l: 0.0,
            cosmo,
            fit_output: None,
        };
        model.log_l = model.integrated_log_l()?;
        Ok(model)
    }

    /// Rebuild a model from persisted scalars, re-running calibration.
    pub fn from_state_record(record: &StateRecord) -> Result<Self, MbbError> {
        Self::new(
            record.log_l,
            record.t,
            record.beta,
            record.z,
            ModelVariant::from_flags(record.opthin, record.pl),
        )
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn n(&self) -> f64 {
        self.n
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// log10 of the canonical-band luminosity [L☉].
    pub fn log_l(&self) -> f64 {
        self.log_l
    }

    pub fn cosmology(&self) -> &Cosmology {
        &self.cosmo
    }

    pub fn params(&self) -> MbbParams {
        MbbParams::new(self.n, self.t, self.beta)
    }

    /// Raw MCMC output of the last `fit`, if any.
    pub fn fit_output(&self) -> Option<&FitOutput> {
        self.fit_output.as_ref()
    }

    /// The six persisted scalars of this state.
    pub fn state_record(&self) -> StateRecord {
        StateRecord {
            log_l: self.log_l,
            t: self.t,
            beta: self.beta,
            z: self.z,
            opthin: self.variant.opthin(),
            pl: self.variant.power_law(),
        }
    }

    /// Evaluate the model's flux [Jy] at observed-frame wavelengths [µm]
    /// for a source shifted to `z_obs`; pass 0 for the rest frame.
    pub fn eval(&self, wl_obs_um: &[f64], z_obs: f64) -> Result<Vec<f64>, MbbError> {
        models::evaluate_checked(self.variant, self.params(), wl_obs_um, z_obs)
    }

    /// Integrated luminosity [L☉] over a wavelength band [µm].
    pub fn luminosity(&self, bounds_um: (f64, f64)) -> Result<f64, MbbError> {
        luminosity::integrate(self.variant, self.params(), self.z, bounds_um, &self.cosmo)
    }

    fn integrated_log_l(&self) -> Result<f64, MbbError> {
        let lum = self.luminosity(CANONICAL_BAND_UM)?;
        if !(lum.is_finite() && lum > 0.0) {
            return Err(MbbError::ModelEvaluation(format!(
                "non-positive luminosity {lum} for current parameters"
            )));
        }
        Ok(lum.log10())
    }

    /// Assign parameters directly and restore the luminosity invariant.
    pub fn update(&mut self, n: f64, t: f64, beta: f64) -> Result<(), MbbError> {
        let previous = (self.n, self.t, self.beta);
        self.n = n;
        self.t = t;
        self.beta = beta;
        match self.integrated_log_l() {
            Ok(log_l) => {
                self.log_l = log_l;
                Ok(())
            }
            Err(e) => {
                // No partial state on failure.
                (self.n, self.t, self.beta) = previous;
                Err(e)
            }
        }
    }

    /// Set a new target luminosity at the given `(T, β)`, re-calibrating
    /// the normalization.
    pub fn update_l(&mut self, target_log_l: f64, t: f64, beta: f64) -> Result<(), MbbError> {
        let n = calibrate(self.variant, target_log_l, t, beta, self.z, &self.cosmo)?;
        self.update(n, t, beta)
    }

    /// Fit the model to photometry and adopt the posterior medians.
    ///
    /// The parameter dimension is 3 when at least three photometric points
    /// are available, otherwise β stays pinned at its current value. The
    /// raw chain is retained for [`ModifiedBlackbody::predictive_band`] and
    /// chain export.
    pub fn fit(
        &mut self,
        phot: &Photometry,
        config: &FitConfig,
    ) -> Result<ChainSummary, MbbError> {
        let init: Vec<f64> = if phot.fits_beta() {
            vec![self.n, self.t, self.beta]
        } else {
            vec![self.n, self.t]
        };
        let posterior = Posterior {
            variant: self.variant,
            phot,
            fixed_beta: self.beta,
        };
        let output = run_ensemble(&posterior, &init, config)?;
        let summary = summarize(&output)?;

        let medians = summary.medians();
        let beta = if medians.len() == 3 { medians[2] } else { self.beta };
        self.update(medians[0], medians[1], beta)?;
        self.fit_output = Some(output);
        Ok(summary)
    }

    /// Posterior-predictive flux band over rest-frame wavelengths [µm].
    ///
    /// Requires a prior `fit`; `nsamples` chain rows are drawn with
    /// replacement.
    pub fn predictive_band<R: Rng>(
        &self,
        wl_um: &[f64],
        nsamples: usize,
        rng: &mut R,
    ) -> Result<PredictiveBand, MbbError> {
        let output = self.fit_output.as_ref().ok_or_else(|| {
            MbbError::Config("no fit has been run; nothing to summarize".to_string())
        })?;
        summary::predictive_band(output, self.variant, self.beta, wl_um, nsamples, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn construction_calibrates_to_target() {
        let model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        assert!((model.log_l() - 12.0).abs() < 1e-3);
        let lum = model.luminosity(CANONICAL_BAND_UM).unwrap();
        assert!((lum.log10() - model.log_l()).abs() < 1e-9);
    }

    #[test]
    fn update_restores_luminosity_invariant() {
        let mut model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        model.update(model.n(), 45.0, 2.0).unwrap();
        let lum = model.luminosity(CANONICAL_BAND_UM).unwrap();
        assert!((lum.log10() - model.log_l()).abs() < 1e-9);
        assert_eq!(model.t(), 45.0);
    }

    #[test]
    fn update_l_recalibrates() {
        let mut model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        model.update_l(11.5, 40.0, 1.5).unwrap();
        assert!((model.log_l() - 11.5).abs() < 1e-3);
        assert_eq!(model.t(), 40.0);
        assert_eq!(model.beta(), 1.5);
    }

    #[test]
    fn failed_update_leaves_state_untouched() {
        let mut model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let before = (model.n(), model.t(), model.beta(), model.log_l());
        // A non-positive temperature poisons the Planck factor.
        assert!(model.update(model.n(), -5.0, 1.8).is_err());
        assert_eq!(
            before,
            (model.n(), model.t(), model.beta(), model.log_l())
        );
    }

    #[test]
    fn state_record_round_trips_through_constructor() {
        let model = ModifiedBlackbody::new(
            12.3,
            42.0,
            2.1,
            1.5,
            ModelVariant::OpticallyThinPowerLaw,
        )
        .unwrap();
        let rebuilt = ModifiedBlackbody::from_state_record(&model.state_record()).unwrap();
        assert_eq!(rebuilt.variant(), model.variant());
        assert_eq!(rebuilt.t(), model.t());
        assert_eq!(rebuilt.beta(), model.beta());
        assert_eq!(rebuilt.z(), model.z());
        assert!((rebuilt.log_l() - model.log_l()).abs() < 1e-3);
    }

    #[test]
    fn rejects_zero_redshift() {
        let err =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 0.0, ModelVariant::GeneralOpacity).unwrap_err();
        assert!(matches!(err, MbbError::Config(_)));
    }

    #[test]
    fn fit_recovers_synthetic_truth() {
        let truth =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let wl = [40.0, 70.0, 110.0, 160.0, 250.0, 400.0];
        let phot = crate::data::generate_photometry(&truth, &wl, 10.0, 7).unwrap();

        let mut model = truth.clone();
        let config = FitConfig {
            nwalkers: 16,
            nburn: 80,
            niter: 200,
            jitter: 1e-4,
            seed: 11,
        };
        let summary = model.fit(&phot, &config).unwrap();

        assert_eq!(summary.per_dim.len(), 3);
        for ci in &summary.per_dim {
            assert!(ci.p16 <= ci.p50 && ci.p50 <= ci.p84);
        }
        // Medians should sit close to the generating parameters.
        assert!((model.t() - 35.0).abs() < 8.0, "T = {}", model.t());
        assert!((model.beta() - 1.8).abs() < 0.6, "beta = {}", model.beta());
        assert!((model.log_l() - 12.0).abs() < 0.3, "log L = {}", model.log_l());

        // The luminosity invariant holds after the fit as well.
        let lum = model.luminosity(CANONICAL_BAND_UM).unwrap();
        assert!((lum.log10() - model.log_l()).abs() < 1e-9);
    }

    #[test]
    fn two_point_photometry_pins_beta() {
        let truth =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let wl = [110.0, 250.0];
        let phot = crate::data::generate_photometry(&truth, &wl, 10.0, 3).unwrap();

        let mut model = truth.clone();
        let config = FitConfig {
            nwalkers: 12,
            nburn: 30,
            niter: 60,
            jitter: 1e-4,
            seed: 5,
        };
        let summary = model.fit(&phot, &config).unwrap();
        assert_eq!(summary.per_dim.len(), 2);
        assert_eq!(model.beta(), 1.8);
    }

    #[test]
    fn predictive_band_requires_a_fit() {
        let model =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(model.predictive_band(&[100.0], 10, &mut rng).is_err());
    }

    #[test]
    fn predictive_band_brackets_the_median_curve() {
        let truth =
            ModifiedBlackbody::new(12.0, 35.0, 1.8, 2.0, ModelVariant::GeneralOpacity).unwrap();
        let wl = [40.0, 70.0, 110.0, 160.0, 250.0, 400.0];
        let phot = crate::data::generate_photometry(&truth, &wl, 10.0, 7).unwrap();

        let mut model = truth.clone();
        let config = FitConfig {
            nwalkers: 16,
            nburn: 40,
            niter: 80,
            jitter: 1e-4,
            seed: 13,
        };
        model.fit(&phot, &config).unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        let grid = [30.0, 100.0, 300.0, 900.0];
        let band = model.predictive_band(&grid, 100, &mut rng).unwrap();
        for i in 0..grid.len() {
            assert!(band.lower_jy[i] <= band.median_jy[i]);
            assert!(band.median_jy[i] <= band.upper_jy[i]);
        }
    }
}
