//! Upstream feature providers
//!
//! Spectral onsets and the pitch track come from an external feature
//! extractor (a novelty-curve peak picker, a pitch tracker). Any estimator
//! that implements [`FeatureProvider`] can be plugged in without touching the
//! fusion logic.

use crate::error::AnalysisError;
use crate::track::{PitchTrack, Signal};

/// Source of the externally estimated features the pipeline consumes
pub trait FeatureProvider {
    /// Spectral novelty onset times in seconds for `signal`
    fn spectral_onsets(&self, signal: &Signal<'_>) -> Result<Vec<f32>, AnalysisError>;

    /// Per-frame pitch of `signal` at `hop_size`, `None` where unvoiced
    fn pitch_track(
        &self,
        signal: &Signal<'_>,
        hop_size: usize,
    ) -> Result<PitchTrack, AnalysisError>;
}

/// Features computed ahead of time and handed over as buffered tracks
#[derive(Debug, Clone)]
pub struct PrecomputedFeatures {
    /// Spectral onset times in seconds
    pub spectral_onsets: Vec<f32>,

    /// Pitch track
    pub pitch_track: PitchTrack,
}

impl PrecomputedFeatures {
    /// Bundle precomputed tracks
    pub fn new(spectral_onsets: Vec<f32>, pitch_track: PitchTrack) -> Self {
        Self {
            spectral_onsets,
            pitch_track,
        }
    }
}

impl FeatureProvider for PrecomputedFeatures {
    fn spectral_onsets(&self, _signal: &Signal<'_>) -> Result<Vec<f32>, AnalysisError> {
        Ok(self.spectral_onsets.clone())
    }

    fn pitch_track(
        &self,
        signal: &Signal<'_>,
        hop_size: usize,
    ) -> Result<PitchTrack, AnalysisError> {
        if self.pitch_track.hop_size() != hop_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Pitch track hop size {} does not match analysis hop size {}",
                self.pitch_track.hop_size(),
                hop_size
            )));
        }
        if self.pitch_track.sample_rate() != signal.sample_rate() {
            return Err(AnalysisError::InvalidInput(format!(
                "Pitch track sample rate {} does not match signal sample rate {}",
                self.pitch_track.sample_rate(),
                signal.sample_rate()
            )));
        }
        Ok(self.pitch_track.clone())
    }
}
