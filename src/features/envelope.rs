//! Amplitude envelope
//!
//! Frame-rate RMS energy of the signal and its frame-to-frame derivative.
//!
//! Algorithm:
//! 1. Slice the signal into frames of `frame_length` samples every `hop_size`
//!    samples (zero-padded at the edges when centered)
//! 2. RMS per frame: sqrt(sum(x^2) / frame_length)
//! 3. Derivative: d[n] = E[n + 1] - E[n], with a trailing zero so both tracks
//!    have the same length

use crate::config::EnvelopeConfig;
use crate::error::AnalysisError;
use crate::track::{AmplitudeTrack, FrameTrack, Signal};

/// Amplitude envelope and its derivative on a shared frame grid
#[derive(Debug, Clone)]
pub struct Envelope {
    /// RMS amplitude per frame (non-negative)
    pub amplitude: AmplitudeTrack,

    /// `amplitude[n + 1] - amplitude[n]`, last frame is 0.0
    pub derivative: AmplitudeTrack,
}

impl Envelope {
    /// Derive the envelope pair from an already computed amplitude track
    pub fn from_amplitude(amplitude: AmplitudeTrack) -> Self {
        let derivative = amplitude_derivative(&amplitude);
        Self {
            amplitude,
            derivative,
        }
    }
}

/// Build the amplitude envelope of `signal`
///
/// An empty signal yields empty tracks.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_length` or `hop_size` is zero
///
/// # Example
///
/// ```
/// use onset_fusion::config::EnvelopeConfig;
/// use onset_fusion::features::envelope::build_envelope;
/// use onset_fusion::track::Signal;
///
/// let samples = vec![0.5f32; 44100];
/// let signal = Signal::new(&samples, 44100)?;
/// let envelope = build_envelope(&signal, &EnvelopeConfig::default())?;
/// assert_eq!(envelope.amplitude.len(), envelope.derivative.len());
/// # Ok::<(), onset_fusion::AnalysisError>(())
/// ```
pub fn build_envelope(
    signal: &Signal<'_>,
    config: &EnvelopeConfig,
) -> Result<Envelope, AnalysisError> {
    if config.frame_length == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame length must be > 0".to_string(),
        ));
    }
    if config.hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    let samples = signal.samples();
    let rms = if config.center {
        centered_rms(samples, config.frame_length, config.hop_size)
    } else {
        framed_rms(samples, config.frame_length, config.hop_size)
    };

    log::debug!(
        "Built envelope: {} samples -> {} frames (frame={}, hop={}, center={})",
        samples.len(),
        rms.len(),
        config.frame_length,
        config.hop_size,
        config.center
    );

    let amplitude = FrameTrack::new(rms, config.hop_size, signal.sample_rate())?;
    Ok(Envelope::from_amplitude(amplitude))
}

/// Successive differences of `amplitude` with a trailing zero appended
pub fn amplitude_derivative(amplitude: &AmplitudeTrack) -> AmplitudeTrack {
    let values = amplitude.values();
    let mut diff: Vec<f32> = values.windows(2).map(|w| w[1] - w[0]).collect();
    if !values.is_empty() {
        diff.push(0.0);
    }

    amplitude.with_values(diff)
}

fn centered_rms(samples: &[f32], frame_length: usize, hop_size: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let half = frame_length / 2;
    let num_frames = 1 + samples.len() / hop_size;

    (0..num_frames)
        .map(|i| {
            // Frame spans [i * hop - half, i * hop - half + frame_length), padding counts as zero
            let start = (i * hop_size).saturating_sub(half);
            let end = (i * hop_size + frame_length - half).min(samples.len());
            frame_rms(samples.get(start..end).unwrap_or(&[]), frame_length)
        })
        .collect()
}

fn framed_rms(samples: &[f32], frame_length: usize, hop_size: usize) -> Vec<f32> {
    if samples.len() < frame_length {
        return Vec::new();
    }

    let num_frames = (samples.len() - frame_length) / hop_size + 1;
    (0..num_frames)
        .map(|i| {
            let start = i * hop_size;
            frame_rms(&samples[start..start + frame_length], frame_length)
        })
        .collect()
}

fn frame_rms(frame: &[f32], frame_length: usize) -> f32 {
    let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
    (sum_sq / frame_length as f32).sqrt()
}
