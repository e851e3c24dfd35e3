//! # Onset Fusion
//!
//! Note onset and note extent detection for monophonic instrument recordings
//! (solo violin and similar), the analytical backbone for score matching and
//! visualization.
//!
//! ## Features
//!
//! - **Energy transients**: adaptive percentile threshold on the RMS envelope derivative
//! - **Pitch jumps**: sustained semitone-scale changes catch legato note changes
//! - **Consensus**: spectral, energy and pitch candidates validated against local loudness change
//! - **Classification**: near-duplicate detections clustered, pitch timing preferred
//! - **Segmentation**: note ends from trailing silence or the next onset
//!
//! ## Quick Start
//!
//! ```no_run
//! use onset_fusion::{analyze_notes, AnalysisConfig, PrecomputedFeatures};
//! use onset_fusion::track::{FrameTrack, Signal};
//!
//! // Mono samples plus features from an external estimator
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let signal = Signal::new(&samples, 44100)?;
//! let pitch = FrameTrack::new(vec![], 512, 44100)?; // Your pitch track
//! let features = PrecomputedFeatures::new(vec![], pitch);
//!
//! let result = analyze_notes(&signal, &features, &AnalysisConfig::default())?;
//! for note in &result.segments {
//!     println!("{:.3}s - {:.3}s", note.onset_time, note.end_time);
//! }
//! # Ok::<(), onset_fusion::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Signal → Envelope → Energy onsets ─┐
//! Pitch track → Pitch-jump onsets ───┼→ Consensus → Classification → Segmentation
//! Spectral onsets (upstream) ────────┘
//! ```
//!
//! Every call is a pure function of its inputs: no state is kept between
//! calls, so analyses can run concurrently without synchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod track;

use std::time::Instant;

use analysis::metadata::{AnalysisFlag, AnalysisMetadata, CandidateCounts};
use features::envelope::{build_envelope, Envelope};
use features::onset::classify::classify_onsets;
use features::onset::consensus::{validate_onsets, OnsetConsensus};
use features::onset::energy_flux::detect_energy_onsets;
use features::onset::pitch_jump::detect_pitch_onsets;
use features::onset::{candidates_from_times, OnsetSource};
use features::segmentation::segment_notes;
use track::{AmplitudeTrack, PitchTrack, Signal};

// Re-export main types
pub use analysis::result::{NoteAnalysis, NoteSegment};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::onset::OnsetCandidate;
pub use io::{FeatureProvider, PrecomputedFeatures};

/// Tolerance for frame timestamps that overshoot the duration by rounding
const TIME_EPSILON: f32 = 1e-4;

/// Main analysis function
///
/// Builds the amplitude envelope of `signal`, pulls the spectral onsets and
/// pitch track from `features`, and runs the full onset fusion and note
/// segmentation pipeline.
///
/// # Arguments
///
/// * `signal` - Mono audio samples
/// * `features` - Upstream spectral onset and pitch estimates
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `NoteAnalysis` with the final onset sequence and note segments. A silent
/// or empty recording yields empty sequences, not an error.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the configuration is invalid, the
/// pitch track is not on the envelope's frame grid, or spectral onsets fall
/// outside the recording
pub fn analyze_notes<P>(
    signal: &Signal<'_>,
    features: &P,
    config: &AnalysisConfig,
) -> Result<NoteAnalysis, AnalysisError>
where
    P: FeatureProvider + ?Sized,
{
    let start_time = Instant::now();
    config.validate()?;

    log::debug!(
        "Starting note analysis: {} samples at {} Hz",
        signal.len(),
        signal.sample_rate()
    );

    let envelope = build_envelope(signal, &config.envelope)?;
    let pitch = features.pitch_track(signal, config.envelope.hop_size)?;
    let spectral = features.spectral_onsets(signal)?;

    run_pipeline(&envelope, &pitch, &spectral, signal.duration(), config, start_time)
}

/// Analyze precomputed tracks
///
/// Same pipeline as [`analyze_notes`], starting from an amplitude envelope
/// that was computed elsewhere.
///
/// # Arguments
///
/// * `amplitude` - Amplitude envelope
/// * `pitch` - Pitch track on the same frame grid as `amplitude`
/// * `spectral_onsets` - Spectral onset times in seconds
/// * `duration` - Recording duration in seconds
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the tracks differ in sample rate,
/// hop size or length, if `duration` is negative or not finite, or if any
/// timestamp lies outside `[0, duration]`
///
/// # Example
///
/// ```
/// use onset_fusion::{analyze_tracks, AnalysisConfig};
/// use onset_fusion::track::FrameTrack;
///
/// let amplitude = FrameTrack::new(vec![0.5f32; 100], 441, 44100)?;
/// let pitch = FrameTrack::new(vec![None; 100], 441, 44100)?;
/// let result = analyze_tracks(&amplitude, &pitch, &[], 1.0, &AnalysisConfig::default())?;
/// assert!(result.onsets.is_empty());
/// # Ok::<(), onset_fusion::AnalysisError>(())
/// ```
pub fn analyze_tracks(
    amplitude: &AmplitudeTrack,
    pitch: &PitchTrack,
    spectral_onsets: &[f32],
    duration: f32,
    config: &AnalysisConfig,
) -> Result<NoteAnalysis, AnalysisError> {
    let start_time = Instant::now();
    config.validate()?;

    let envelope = Envelope::from_amplitude(amplitude.clone());
    run_pipeline(&envelope, pitch, spectral_onsets, duration, config, start_time)
}

fn run_pipeline(
    envelope: &Envelope,
    pitch: &PitchTrack,
    spectral_onsets: &[f32],
    duration: f32,
    config: &AnalysisConfig,
    start_time: Instant,
) -> Result<NoteAnalysis, AnalysisError> {
    validate_inputs(&envelope.amplitude, pitch, spectral_onsets, duration)?;

    // 4.2-4.3: candidate sources
    let energy = detect_energy_onsets(&envelope.derivative, &config.energy)?;
    let pitch_onsets = detect_pitch_onsets(pitch, &config.pitch);

    let consensus = OnsetConsensus {
        spectral: candidates_from_times(spectral_onsets, OnsetSource::Spectral),
        energy,
        pitch: pitch_onsets,
    };

    // 4.4-4.5: fusion and classification
    let validated = validate_onsets(&consensus, &envelope.amplitude, &config.validation);
    let classification = classify_onsets(&validated, &config.classification);

    // Millisecond rounding may push the last onset just past the end
    let mut onsets: Vec<f32> = classification
        .onsets
        .iter()
        .map(|&t| t.min(duration))
        .collect();
    onsets.dedup();

    // 4.6: note extents
    let segments = segment_notes(&onsets, &envelope.amplitude, duration, &config.segmentation)?;

    let mut flags = Vec::new();
    let min_hz = config.pitch.min_confident_hz;
    if !pitch
        .values()
        .iter()
        .any(|p| matches!(p, Some(hz) if hz.is_finite() && *hz >= min_hz))
    {
        flags.push(AnalysisFlag::NoVoicedFrames);
    }
    if !envelope.derivative.values().iter().any(|&d| d > 0.0) {
        flags.push(AnalysisFlag::NoPositiveEnergyFlux);
    }
    if onsets.is_empty() {
        flags.push(AnalysisFlag::NoOnsets);
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Note analysis complete: {} onsets, {} segments in {:.2}ms",
        onsets.len(),
        segments.len(),
        processing_time_ms
    );

    Ok(NoteAnalysis {
        onsets,
        segments,
        validated_onsets: validated.times(),
        metadata: AnalysisMetadata {
            duration_seconds: duration,
            sample_rate: envelope.amplitude.sample_rate(),
            hop_size: envelope.amplitude.hop_size(),
            processing_time_ms,
            candidate_counts: CandidateCounts {
                spectral: consensus.spectral.len(),
                energy: consensus.energy.len(),
                pitch: consensus.pitch.len(),
                validated: validated.len(),
            },
            flags,
            ..AnalysisMetadata::default()
        },
    })
}

fn validate_inputs(
    amplitude: &AmplitudeTrack,
    pitch: &PitchTrack,
    spectral_onsets: &[f32],
    duration: f32,
) -> Result<(), AnalysisError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Duration must be finite and >= 0, got {}",
            duration
        )));
    }

    if !amplitude.is_aligned_with(pitch) {
        return Err(AnalysisError::InvalidInput(format!(
            "Amplitude track ({} frames, hop {}, {} Hz) and pitch track ({} frames, hop {}, {} Hz) are not aligned",
            amplitude.len(),
            amplitude.hop_size(),
            amplitude.sample_rate(),
            pitch.len(),
            pitch.hop_size(),
            pitch.sample_rate()
        )));
    }

    if let Some(&last) = amplitude.times().last() {
        if last > duration + TIME_EPSILON {
            return Err(AnalysisError::InvalidInput(format!(
                "Tracks extend to {:.4}s, past the {:.4}s duration",
                last, duration
            )));
        }
    }

    if let Some(&t) = spectral_onsets
        .iter()
        .find(|&&t| !t.is_finite() || t < 0.0 || t > duration)
    {
        return Err(AnalysisError::InvalidInput(format!(
            "Spectral onset {} lies outside [0, {}]",
            t, duration
        )));
    }

    Ok(())
}
