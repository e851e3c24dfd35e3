//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;

/// Time interval attributed to a single played note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteSegment {
    /// Note start in seconds
    pub onset_time: f32,

    /// Note end in seconds, always after `onset_time`
    pub end_time: f32,
}

impl NoteSegment {
    /// Create a segment
    pub fn new(onset_time: f32, end_time: f32) -> Self {
        Self {
            onset_time,
            end_time,
        }
    }

    /// Length of the note in seconds
    ///
    /// # Example
    ///
    /// ```
    /// use onset_fusion::analysis::result::NoteSegment;
    ///
    /// let note = NoteSegment::new(1.0, 1.5);
    /// assert_eq!(note.duration(), 0.5);
    /// ```
    pub fn duration(&self) -> f32 {
        self.end_time - self.onset_time
    }
}

/// Complete onset and note analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAnalysis {
    /// Final onset sequence in seconds, strictly increasing
    pub onsets: Vec<f32>,

    /// Note segments in onset order
    pub segments: Vec<NoteSegment>,

    /// All amplitude-validated onset timestamps, including spectral survivors
    /// that are not reclassified into `onsets`
    pub validated_onsets: Vec<f32>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metadata::{AnalysisFlag, CandidateCounts};

    #[test]
    fn test_note_segment_duration() {
        let note = NoteSegment::new(0.25, 1.0);
        assert!((note.duration() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_note_analysis_serializes() {
        let analysis = NoteAnalysis {
            onsets: vec![1.0],
            segments: vec![NoteSegment::new(1.0, 2.0)],
            validated_onsets: vec![1.0],
            metadata: AnalysisMetadata {
                duration_seconds: 2.0,
                sample_rate: 44100,
                hop_size: 512,
                processing_time_ms: 0.5,
                algorithm_version: "test".to_string(),
                candidate_counts: CandidateCounts {
                    spectral: 0,
                    energy: 0,
                    pitch: 1,
                    validated: 1,
                },
                flags: vec![AnalysisFlag::NoPositiveEnergyFlux],
            },
        };

        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"onset_time\":1.0"));
        assert!(json.contains("NoPositiveEnergyFlux"));

        let back: NoteAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back.segments, analysis.segments);
        assert_eq!(back.metadata.candidate_counts, analysis.metadata.candidate_counts);
    }
}
