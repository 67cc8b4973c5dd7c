//! Order statistics for chain summarization.

/// Compute the `q`-th percentile (0–100) of `values` with linear
/// interpolation between order statistics.
///
/// Returns `None` for an empty slice or a `q` outside [0, 100]. Non-finite
/// values are sorted to the end and will contaminate high percentiles, so
/// callers are expected to filter first.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(percentile_sorted(&sorted, q))
}

/// Percentile of an already-sorted slice (linear interpolation).
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (n as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
