//! Onset consensus
//!
//! Merges candidates from all detectors and keeps only those backed by local
//! amplitude evidence. A spectral or energy flag with no accompanying loudness
//! change is almost always bow noise or a string crossing, not a note start.
//!
//! Pitch candidates are trusted as-is: they are already filtered by the
//! pitch-jump detector and they seed the accepted set.

use super::{sort_candidates, OnsetCandidate, OnsetSource};
use crate::config::ValidationConfig;
use crate::track::AmplitudeTrack;

/// Onset candidates from all detectors
#[derive(Debug, Clone, Default)]
pub struct OnsetConsensus {
    /// Upstream spectral novelty onsets
    pub spectral: Vec<OnsetCandidate>,
    /// Energy flux onsets
    pub energy: Vec<OnsetCandidate>,
    /// Pitch-jump onsets
    pub pitch: Vec<OnsetCandidate>,
}

impl OnsetConsensus {
    /// All candidates in time order
    pub fn merged(&self) -> Vec<OnsetCandidate> {
        let mut all: Vec<OnsetCandidate> = self
            .spectral
            .iter()
            .chain(&self.energy)
            .chain(&self.pitch)
            .copied()
            .collect();
        sort_candidates(&mut all);
        all
    }

    /// Total number of candidates across detectors
    pub fn len(&self) -> usize {
        self.spectral.len() + self.energy.len() + self.pitch.len()
    }

    /// True if no detector produced a candidate
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Onsets that survived validation, with their sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedOnsets {
    candidates: Vec<OnsetCandidate>,
}

impl ValidatedOnsets {
    /// Wrap candidates that were validated elsewhere; sorts and drops exact repeats
    pub fn from_candidates(mut candidates: Vec<OnsetCandidate>) -> Self {
        sort_candidates(&mut candidates);
        Self { candidates }
    }

    /// Validated candidates sorted by time then source
    pub fn candidates(&self) -> &[OnsetCandidate] {
        &self.candidates
    }

    /// Time-sorted validated timestamps with repeats removed
    pub fn times(&self) -> Vec<f32> {
        let mut times: Vec<f32> = self.candidates.iter().map(|c| c.time_seconds).collect();
        times.dedup();
        times
    }

    /// Timestamps of validated candidates from any of `sources`, in time order
    pub fn times_from(&self, sources: &[OnsetSource]) -> Vec<f32> {
        self.candidates
            .iter()
            .filter(|c| sources.contains(&c.source))
            .map(|c| c.time_seconds)
            .collect()
    }

    /// Number of validated candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if nothing survived validation
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Validate merged onset candidates against the amplitude envelope
///
/// For every non-pitch candidate `t`:
/// - skip it if it lies within `pitch_tolerance_seconds` of a pitch onset
/// - reject it if the amplitude at the nearest frame is below `min_amplitude`
/// - reject it if fewer than 2 frames fall in `[t, t + variation_window_seconds]`
/// - reject it if the amplitude range in that window is below `min_variation`
///
/// # Arguments
///
/// * `consensus` - Candidates from all detectors, in any order
/// * `amplitude` - Amplitude envelope
/// * `config` - Validation thresholds
///
/// # Returns
///
/// Pitch candidates plus every candidate that passed validation, time-sorted
pub fn validate_onsets(
    consensus: &OnsetConsensus,
    amplitude: &AmplitudeTrack,
    config: &ValidationConfig,
) -> ValidatedOnsets {
    let mut pitch = consensus.pitch.clone();
    sort_candidates(&mut pitch);
    let pitch_times: Vec<f32> = pitch.iter().map(|c| c.time_seconds).collect();

    let mut accepted = pitch;
    let mut rejected = 0usize;

    for candidate in consensus.merged() {
        let t = candidate.time_seconds;
        if candidate.source == OnsetSource::Pitch
            || near_any(t, &pitch_times, config.pitch_tolerance_seconds)
        {
            continue;
        }
        if has_amplitude_support(t, amplitude, config) {
            accepted.push(candidate);
        } else {
            rejected += 1;
        }
    }

    let validated = ValidatedOnsets::from_candidates(accepted);

    log::debug!(
        "Onset consensus: {} candidates ({} spectral, {} energy, {} pitch), {} accepted, {} rejected",
        consensus.len(),
        consensus.spectral.len(),
        consensus.energy.len(),
        consensus.pitch.len(),
        validated.len(),
        rejected
    );

    validated
}

fn has_amplitude_support(t: f32, amplitude: &AmplitudeTrack, config: &ValidationConfig) -> bool {
    let values = amplitude.values();

    let Some(idx) = amplitude.nearest_frame(t) else {
        return false;
    };
    if values[idx] < config.min_amplitude {
        return false;
    }

    let window = amplitude.frames_between(t, t + config.variation_window_seconds);
    if window.len() < 2 {
        return false;
    }

    let segment = &values[window];
    let max = segment.iter().copied().fold(f32::MIN, f32::max);
    let min = segment.iter().copied().fold(f32::MAX, f32::min);
    max - min >= config.min_variation
}

pub(crate) fn near_any(t: f32, times: &[f32], tolerance: f32) -> bool {
    times.iter().any(|&p| (t - p).abs() < tolerance)
}
