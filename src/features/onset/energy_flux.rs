//! Energy flux onset detection
//!
//! Detects onsets at frames where the amplitude envelope rises sharply.
//!
//! Algorithm:
//! 1. Keep only strictly positive envelope deltas (rising energy)
//! 2. Take the configured percentile of that subset as the threshold
//! 3. Emit a candidate at every frame whose delta exceeds the threshold
//!
//! # Example
//!
//! ```
//! use onset_fusion::config::EnergyOnsetConfig;
//! use onset_fusion::features::onset::energy_flux::detect_energy_onsets;
//! use onset_fusion::track::FrameTrack;
//!
//! let derivative = FrameTrack::new(vec![0.0f32; 100], 512, 44100)?;
//! let onsets = detect_energy_onsets(&derivative, &EnergyOnsetConfig::default())?;
//! assert!(onsets.is_empty());
//! # Ok::<(), onset_fusion::AnalysisError>(())
//! ```

use super::threshold::percentile_threshold;
use super::{OnsetCandidate, OnsetSource};
use crate::config::EnergyOnsetConfig;
use crate::error::AnalysisError;
use crate::track::AmplitudeTrack;

/// Detect onsets from the amplitude derivative
///
/// # Reference
///
/// Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
/// A Tutorial on Onset Detection in Music Signals.
/// *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.
///
/// # Arguments
///
/// * `derivative` - Frame-to-frame amplitude differences (see [`crate::features::envelope`])
/// * `config` - Percentile used for the adaptive threshold
///
/// # Returns
///
/// Energy-tagged candidates in time order. If no delta is positive the result
/// is empty.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the percentile is out of range
pub fn detect_energy_onsets(
    derivative: &AmplitudeTrack,
    config: &EnergyOnsetConfig,
) -> Result<Vec<OnsetCandidate>, AnalysisError> {
    let positive: Vec<f32> = derivative
        .values()
        .iter()
        .copied()
        .filter(|&d| d > 0.0)
        .collect();

    if positive.is_empty() {
        log::debug!("No positive energy flux, no energy onsets detected");
        return Ok(Vec::new());
    }

    let threshold = percentile_threshold(&positive, config.percentile)?;

    let onsets: Vec<OnsetCandidate> = derivative
        .iter()
        .filter(|&(_, &d)| d > threshold)
        .map(|(t, _)| OnsetCandidate::new(t, OnsetSource::Energy))
        .collect();

    log::debug!(
        "Energy flux: {} positive deltas, threshold={:.6} (p{:.0}), {} onsets",
        positive.len(),
        threshold,
        config.percentile * 100.0,
        onsets.len()
    );

    Ok(onsets)
}
