//! Adaptive thresholding for onset detection
//!
//! A fixed flux threshold fails across recordings with different dynamic
//! ranges, so the cutoff is taken as a percentile of the observed values.

use crate::error::AnalysisError;

/// Compute a percentile-based threshold
///
/// Uses linear interpolation between the two nearest order statistics, so the
/// 0.0 and 1.0 percentiles are the minimum and maximum.
///
/// # Arguments
///
/// * `values` - Flux/energy values to threshold
/// * `percentile` - Percentile as a fraction (0.0-1.0), e.g. 0.84 for the 84th percentile
///
/// # Returns
///
/// Threshold value at the specified percentile
///
/// # Errors
///
/// Returns `AnalysisError` if values are empty or percentile is out of range
pub fn percentile_threshold(values: &[f32], percentile: f32) -> Result<f32, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty values for threshold calculation".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&percentile) {
        return Err(AnalysisError::InvalidInput(format!(
            "Percentile must be in [0.0, 1.0], got {}",
            percentile
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = percentile as f64 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = (rank - lo as f64) as f32;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
