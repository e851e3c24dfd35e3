//! Onset detection modules
//!
//! Three independently noisy candidate sources fused into one onset sequence:
//! - Energy transients (adaptive percentile threshold on the envelope derivative)
//! - Pitch jumps (sustained semitone-scale changes in the pitch track)
//! - Spectral novelty (supplied by an upstream estimator)
//! - Consensus: amplitude-validated fusion of all three
//! - Classification: clustering of near-duplicate detections

pub mod classify;
pub mod consensus;
pub mod energy_flux;
pub mod pitch_jump;
pub mod threshold;

use serde::{Deserialize, Serialize};

/// Detector that produced an onset candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OnsetSource {
    /// Upstream spectral novelty/flux estimator
    Spectral,
    /// Envelope derivative above the adaptive threshold
    Energy,
    /// Sustained pitch jump
    Pitch,
}

/// Onset candidate tagged with the detector that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnsetCandidate {
    /// Onset time in seconds (non-negative)
    pub time_seconds: f32,

    /// Detector that produced this candidate
    pub source: OnsetSource,
}

impl OnsetCandidate {
    /// Create a candidate
    pub fn new(time_seconds: f32, source: OnsetSource) -> Self {
        Self {
            time_seconds,
            source,
        }
    }
}

/// Tag raw timestamps with a source
pub fn candidates_from_times(times: &[f32], source: OnsetSource) -> Vec<OnsetCandidate> {
    times
        .iter()
        .map(|&t| OnsetCandidate::new(t, source))
        .collect()
}

/// Sort candidates by time, then by source, and drop exact repeats
pub(crate) fn sort_candidates(candidates: &mut Vec<OnsetCandidate>) {
    candidates.sort_by(|a, b| {
        a.time_seconds
            .partial_cmp(&b.time_seconds)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.source.cmp(&b.source))
    });
    candidates.dedup();
}
