//! Deterministic evaluation grids.

use crate::error::MbbError;

/// Generate `steps` linearly spaced points between `min` and `max` (inclusive).
pub fn linspace(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, MbbError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(MbbError::Config(format!(
            "invalid grid range: min={min}, max={max} (must be finite and max > min)"
        )));
    }
    if steps < 2 {
        return Err(MbbError::Config("grid steps must be >= 2".to_string()));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    Ok(out)
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
///
/// Used for wavelength grids in curve exports, where SEDs are naturally
/// sampled per decade.
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, MbbError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(MbbError::Config(format!(
            "invalid log grid range: min={min}, max={max} (must be finite, > 0, and max > min)"
        )));
    }
    if steps < 2 {
        return Err(MbbError::Config("grid steps must be >= 2".to_string()));
    }

    let ln_min = min.ln();
    let step = (max.ln() - ln_min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}
