//! Onset deduplication and classification
//!
//! Several detectors (and several frames of one detector) often flag the same
//! note start. Validated onsets are clustered so each note start is reported
//! once, with pitch-sourced timing taking precedence.
//!
//! Algorithm:
//! 1. Round timestamps to milliseconds and drop exact repeats
//! 2. First pass: an onset farther than `cluster_window_seconds` from every
//!    onset already placed is confirmed, otherwise it is suppressed
//! 3. Second pass over confirmed then suppressed onsets: keep the first, keep
//!    confirmed onsets more than `merge_gap_seconds` after the previous kept
//!    one, and always keep onsets within `pitch_tolerance_seconds` of a pitch
//!    onset

use super::consensus::{near_any, ValidatedOnsets};
use super::OnsetSource;
use crate::config::ClassificationConfig;

/// Result of onset classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnsetClassification {
    /// Onsets that opened a new cluster, in time order
    pub confirmed: Vec<f32>,

    /// Onsets that fell inside an existing cluster, in time order
    pub suppressed: Vec<f32>,

    /// Final onset sequence, strictly increasing
    pub onsets: Vec<f32>,
}

/// Cluster validated onsets into the final onset sequence
///
/// Only pitch and energy onsets are classified unless
/// `config.include_spectral` is set.
///
/// # Example
///
/// ```
/// use onset_fusion::config::ClassificationConfig;
/// use onset_fusion::features::onset::classify::classify_onsets;
/// use onset_fusion::features::onset::consensus::ValidatedOnsets;
/// use onset_fusion::features::onset::{OnsetCandidate, OnsetSource};
///
/// let validated = ValidatedOnsets::from_candidates(vec![
///     OnsetCandidate::new(1.0, OnsetSource::Energy),
///     OnsetCandidate::new(1.05, OnsetSource::Energy),
///     OnsetCandidate::new(2.0, OnsetSource::Energy),
/// ]);
/// let result = classify_onsets(&validated, &ClassificationConfig::default());
/// assert_eq!(result.onsets, vec![1.0, 2.0]);
/// ```
pub fn classify_onsets(
    validated: &ValidatedOnsets,
    config: &ClassificationConfig,
) -> OnsetClassification {
    let sources: &[OnsetSource] = if config.include_spectral {
        &[OnsetSource::Pitch, OnsetSource::Energy, OnsetSource::Spectral]
    } else {
        &[OnsetSource::Pitch, OnsetSource::Energy]
    };

    let pitch_times = validated.times_from(&[OnsetSource::Pitch]);

    let mut millis: Vec<i64> = validated
        .times_from(sources)
        .iter()
        .map(|&t| (t as f64 * 1000.0).round() as i64)
        .collect();
    millis.sort_unstable();
    millis.dedup();

    let mut confirmed: Vec<f32> = Vec::new();
    let mut suppressed: Vec<f32> = Vec::new();

    for t in millis.into_iter().map(|ms| ms as f32 / 1000.0) {
        let clustered = near_any(t, &confirmed, config.cluster_window_seconds)
            || near_any(t, &suppressed, config.cluster_window_seconds);
        if clustered {
            suppressed.push(t);
        } else {
            confirmed.push(t);
        }
    }

    let mut onsets: Vec<f32> = Vec::with_capacity(confirmed.len());
    let mut last_kept: Option<f32> = None;

    let walk = confirmed
        .iter()
        .map(|&t| (t, true))
        .chain(suppressed.iter().map(|&t| (t, false)));

    for (t, is_confirmed) in walk {
        let keep = match last_kept {
            None => true,
            Some(prev) => {
                near_any(t, &pitch_times, config.pitch_tolerance_seconds)
                    || (is_confirmed && t - prev > config.merge_gap_seconds)
            }
        };
        if keep {
            onsets.push(t);
            last_kept = Some(t);
        }
    }

    onsets.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    onsets.dedup();

    log::debug!(
        "Onset classification: {} confirmed, {} suppressed, {} final",
        confirmed.len(),
        suppressed.len(),
        onsets.len()
    );

    OnsetClassification {
        confirmed,
        suppressed,
        onsets,
    }
}
