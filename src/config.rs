//! Configuration parameters for onset and note analysis
//!
//! Every threshold and window used by the pipeline lives here so that callers
//! can override them per call. Nothing in the pipeline reads global state.

use crate::error::AnalysisError;

/// Amplitude envelope parameters
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// Samples per analysis frame (default: 2048)
    pub frame_length: usize,

    /// Samples between consecutive frames (default: 512)
    pub hop_size: usize,

    /// Center frames on their hop position, zero-padding the edges (default: true)
    ///
    /// With centering a signal of `n` samples yields `1 + n / hop_size` frames
    /// and frame `i` is stamped at `i * hop_size / sample_rate` seconds.
    pub center: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_size: 512,
            center: true,
        }
    }
}

/// Energy-transient onset parameters
#[derive(Debug, Clone)]
pub struct EnergyOnsetConfig {
    /// Percentile of the positive envelope deltas used as the adaptive cutoff,
    /// as a fraction in [0.0, 1.0] (default: 0.84)
    pub percentile: f32,
}

impl Default for EnergyOnsetConfig {
    fn default() -> Self {
        Self { percentile: 0.84 }
    }
}

/// Pitch-jump onset parameters
#[derive(Debug, Clone)]
pub struct PitchOnsetConfig {
    /// Pitches below this are treated as unvoiced (default: 350.0 Hz)
    ///
    /// Filters sub-harmonic/octave errors and near-silent frames.
    pub min_confident_hz: f32,

    /// Minimum semitone distance that counts as a jump (default: 0.5)
    pub semitone_threshold: f32,

    /// How far back to look for a diverging frame (default: 0.1 s)
    pub lookback_seconds: f32,

    /// Minimum time between two pitch onsets (default: 0.15 s)
    pub min_interval_seconds: f32,
}

impl Default for PitchOnsetConfig {
    fn default() -> Self {
        Self {
            min_confident_hz: 350.0,
            semitone_threshold: 0.5,
            lookback_seconds: 0.1,
            min_interval_seconds: 0.15,
        }
    }
}

/// Onset fusion and amplitude validation parameters
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Amplitude floor at the candidate frame (default: 0.0001)
    pub min_amplitude: f32,

    /// Minimum amplitude range (max - min) inside the variation window (default: 0.05)
    pub min_variation: f32,

    /// Length of the window starting at the candidate (default: 0.2 s)
    pub variation_window_seconds: f32,

    /// Candidates this close to a pitch onset are the same event (default: 0.01 s)
    pub pitch_tolerance_seconds: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_amplitude: 0.0001,
            min_variation: 0.05,
            variation_window_seconds: 0.2,
            pitch_tolerance_seconds: 0.01,
        }
    }
}

/// Onset deduplication/classification parameters
#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    /// Onsets closer than this to an already placed onset are suppressed (default: 0.15 s)
    pub cluster_window_seconds: f32,

    /// Minimum gap to the previously kept onset in the second pass (default: 0.1 s)
    ///
    /// Only confirmed onsets are subject to this gap; suppressed onsets
    /// survive only next to a pitch onset. Confirmed onsets are already at
    /// least `cluster_window_seconds` apart, so the gap drops nothing unless
    /// it is larger than the cluster window.
    pub merge_gap_seconds: f32,

    /// Onsets this close to a pitch onset always survive (default: 0.01 s)
    pub pitch_tolerance_seconds: f32,

    /// Let validated spectral onsets take part in classification (default: false)
    ///
    /// By default only pitch and energy onsets are clustered; spectral
    /// survivors are reported as validated onsets but not reclassified.
    pub include_spectral: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            cluster_window_seconds: 0.15,
            merge_gap_seconds: 0.1,
            pitch_tolerance_seconds: 0.01,
            include_spectral: false,
        }
    }
}

/// Note segmentation parameters
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// Amplitude below which a note is considered to have ended (default: 0.01)
    pub silence_floor: f32,

    /// Emit a segment from t = 0 to the first onset when the recording
    /// starts mid-note (default: true)
    pub leading_note: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            silence_floor: 0.01,
            leading_note: true,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Amplitude envelope construction
    pub envelope: EnvelopeConfig,

    /// Energy-transient detector
    pub energy: EnergyOnsetConfig,

    /// Pitch-jump detector
    pub pitch: PitchOnsetConfig,

    /// Fusion and validation
    pub validation: ValidationConfig,

    /// Deduplication and classification
    pub classification: ClassificationConfig,

    /// Note segmentation
    pub segmentation: SegmentationConfig,
}

impl AnalysisConfig {
    /// Check every parameter for range and finiteness
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending parameter
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.envelope.frame_length == 0 {
            return Err(invalid("envelope.frame_length must be > 0"));
        }
        if self.envelope.hop_size == 0 {
            return Err(invalid("envelope.hop_size must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.energy.percentile) {
            return Err(AnalysisError::InvalidInput(format!(
                "energy.percentile must be in [0.0, 1.0], got {}",
                self.energy.percentile
            )));
        }

        let non_negative = [
            ("pitch.min_confident_hz", self.pitch.min_confident_hz),
            ("pitch.semitone_threshold", self.pitch.semitone_threshold),
            ("pitch.lookback_seconds", self.pitch.lookback_seconds),
            ("pitch.min_interval_seconds", self.pitch.min_interval_seconds),
            ("validation.min_amplitude", self.validation.min_amplitude),
            ("validation.min_variation", self.validation.min_variation),
            (
                "validation.variation_window_seconds",
                self.validation.variation_window_seconds,
            ),
            (
                "validation.pitch_tolerance_seconds",
                self.validation.pitch_tolerance_seconds,
            ),
            (
                "classification.cluster_window_seconds",
                self.classification.cluster_window_seconds,
            ),
            (
                "classification.merge_gap_seconds",
                self.classification.merge_gap_seconds,
            ),
            (
                "classification.pitch_tolerance_seconds",
                self.classification.pitch_tolerance_seconds,
            ),
            ("segmentation.silence_floor", self.segmentation.silence_floor),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> AnalysisError {
    AnalysisError::InvalidInput(msg.to_string())
}
