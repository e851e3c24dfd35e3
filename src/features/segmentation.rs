//! Note segmentation
//!
//! Turns the final onset sequence into note intervals. A note runs from its
//! onset until the amplitude first drops below the silence floor, or until the
//! next onset (the recording end for the last note) if it never does.

use crate::analysis::result::NoteSegment;
use crate::config::SegmentationConfig;
use crate::error::AnalysisError;
use crate::track::AmplitudeTrack;

/// Segment notes from onsets and the amplitude envelope
///
/// # Arguments
///
/// * `onsets` - Final onset sequence in seconds, strictly increasing
/// * `amplitude` - Amplitude envelope
/// * `duration` - Recording duration in seconds
/// * `config` - Silence floor and leading-note handling
///
/// # Returns
///
/// One segment per onset, in onset order, each with
/// `onset_time < end_time <= next onset` (or `<= duration` for the last).
/// With `leading_note` enabled, a recording that is already sounding at
/// t = 0 gets an extra segment from 0 to the first onset.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `duration` is negative or not
/// finite, or if onsets are unsorted or outside `[0, duration]`
pub fn segment_notes(
    onsets: &[f32],
    amplitude: &AmplitudeTrack,
    duration: f32,
    config: &SegmentationConfig,
) -> Result<Vec<NoteSegment>, AnalysisError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Duration must be finite and >= 0, got {}",
            duration
        )));
    }
    if onsets.windows(2).any(|w| w[1] <= w[0]) {
        return Err(AnalysisError::InvalidInput(
            "Onsets must be strictly increasing".to_string(),
        ));
    }
    if let Some(&t) = onsets
        .iter()
        .find(|&&t| !t.is_finite() || t < 0.0 || t > duration)
    {
        return Err(AnalysisError::InvalidInput(format!(
            "Onset {} lies outside [0, {}]",
            t, duration
        )));
    }

    let mut segments = Vec::with_capacity(onsets.len() + 1);

    if config.leading_note {
        if let (Some(&first), Some(&initial)) = (onsets.first(), amplitude.values().first()) {
            if first > 0.0 && initial >= config.silence_floor {
                segments.push(note_extent(0.0, first, amplitude, config.silence_floor));
            }
        }
    }

    for (i, &onset) in onsets.iter().enumerate() {
        let tentative_end = onsets.get(i + 1).copied().unwrap_or(duration);
        if tentative_end <= onset {
            // Onset at the very end of the recording
            continue;
        }
        segments.push(note_extent(onset, tentative_end, amplitude, config.silence_floor));
    }

    log::debug!(
        "Segmented {} notes from {} onsets over {:.2}s",
        segments.len(),
        onsets.len(),
        duration
    );

    Ok(segments)
}

fn note_extent(
    onset: f32,
    tentative_end: f32,
    amplitude: &AmplitudeTrack,
    silence_floor: f32,
) -> NoteSegment {
    let times = amplitude.times();
    let values = amplitude.values();

    let end_time = amplitude
        .frames_between(onset, tentative_end)
        .filter(|&i| times[i] > onset)
        .find(|&i| values[i] < silence_floor)
        .map(|i| times[i])
        .unwrap_or(tentative_end);

    NoteSegment::new(onset, end_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::FrameTrack;

    /// 100 frames per second
    fn amplitude(values: Vec<f32>) -> AmplitudeTrack {
        FrameTrack::new(values, 441, 44100).unwrap()
    }

    #[test]
    fn test_segments_end_at_next_onset() {
        let amp = amplitude(vec![0.3; 200]);
        let config = SegmentationConfig::default();
        let segments = segment_notes(&[0.0, 1.0], &amp, 2.0, &config).unwrap();
        assert_eq!(
            segments,
            vec![NoteSegment::new(0.0, 1.0), NoteSegment::new(1.0, 2.0)]
        );
    }

    #[test]
    fn test_segments_end_at_silence() {
        let values: Vec<f32> = (0..200)
            .map(|i| if (60..100).contains(&i) || i >= 150 { 0.0 } else { 0.3 })
            .collect();
        let config = SegmentationConfig::default();
        let segments = segment_notes(&[0.0, 1.0], &amplitude(values), 2.0, &config).unwrap();
        assert_eq!(segments.len(), 2);
        assert!((segments[0].end_time - 0.6).abs() < 1e-6);
        assert!((segments[1].end_time - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_silent_onset_frame_still_yields_valid_segment() {
        let mut values = vec![0.3f32; 200];
        values[100] = 0.0;
        let segments =
            segment_notes(&[1.0], &amplitude(values), 2.0, &SegmentationConfig::default()).unwrap();
        let last = segments.last().unwrap();
        assert!(last.onset_time < last.end_time);
    }

    #[test]
    fn test_leading_note() {
        let amp = amplitude(vec![0.3; 200]);
        let segments = segment_notes(&[1.0], &amp, 2.0, &SegmentationConfig::default()).unwrap();
        assert_eq!(
            segments,
            vec![NoteSegment::new(0.0, 1.0), NoteSegment::new(1.0, 2.0)]
        );

        let config = SegmentationConfig {
            leading_note: false,
            ..SegmentationConfig::default()
        };
        let segments = segment_notes(&[1.0], &amp, 2.0, &config).unwrap();
        assert_eq!(segments, vec![NoteSegment::new(1.0, 2.0)]);
    }

    #[test]
    fn test_no_leading_note_after_silence() {
        let values: Vec<f32> = (0..200).map(|i| if i < 100 { 0.0 } else { 0.3 }).collect();
        let segments =
            segment_notes(&[1.0], &amplitude(values), 2.0, &SegmentationConfig::default()).unwrap();
        assert_eq!(segments, vec![NoteSegment::new(1.0, 2.0)]);
    }

    #[test]
    fn test_onset_at_duration_is_skipped() {
        let amp = amplitude(vec![0.3; 200]);
        let config = SegmentationConfig::default();
        let segments = segment_notes(&[0.0, 2.0], &amp, 2.0, &config).unwrap();
        assert_eq!(segments, vec![NoteSegment::new(0.0, 2.0)]);
    }

    #[test]
    fn test_no_onsets() {
        let amp = amplitude(vec![0.3; 200]);
        let segments = segment_notes(&[], &amp, 2.0, &SegmentationConfig::default()).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        let amp = amplitude(vec![0.3; 200]);
        let config = SegmentationConfig::default();
        assert!(segment_notes(&[0.5], &amp, -1.0, &config).is_err());
        assert!(segment_notes(&[0.5], &amp, f32::NAN, &config).is_err());
        assert!(segment_notes(&[1.0, 0.5], &amp, 2.0, &config).is_err());
        assert!(segment_notes(&[0.5, 3.0], &amp, 2.0, &config).is_err());
        assert!(segment_notes(&[-0.1], &amp, 2.0, &config).is_err());
    }
}
