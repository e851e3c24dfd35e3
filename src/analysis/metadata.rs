//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Conditions worth reporting alongside an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// No pitch frame was above the confidence floor
    NoVoicedFrames,
    /// The envelope never rose, so the energy detector had nothing to threshold
    NoPositiveEnergyFlux,
    /// The final onset sequence is empty
    NoOnsets,
}

/// Candidate counts per pipeline stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCounts {
    /// Spectral candidates supplied upstream
    pub spectral: usize,
    /// Energy flux candidates
    pub energy: usize,
    /// Pitch-jump candidates
    pub pitch: usize,
    /// Candidates that survived validation
    pub validated: usize,
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Recording duration in seconds
    pub duration_seconds: f32,

    /// Sample rate of the frame tracks in Hz
    pub sample_rate: u32,

    /// Hop size of the frame tracks in samples
    pub hop_size: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Candidate counts per stage
    pub candidate_counts: CandidateCounts,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate: 0,
            hop_size: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            candidate_counts: CandidateCounts::default(),
            flags: vec![],
        }
    }
}
