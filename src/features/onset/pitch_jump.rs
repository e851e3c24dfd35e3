//! Pitch-jump onset detection
//!
//! Catches legato/slurred note changes that produce no energy transient by
//! looking for sustained semitone-scale jumps in the pitch track.
//!
//! Algorithm:
//! 1. Convert confident frames (voiced, >= `min_confident_hz`) to semitones
//! 2. For each defined frame at least `min_interval_seconds` after the last
//!    onset, scan backwards through the `lookback_seconds` window
//! 3. The first earlier defined frame that differs by more than
//!    `semitone_threshold` makes this frame an onset

use super::{OnsetCandidate, OnsetSource};
use crate::config::PitchOnsetConfig;
use crate::features::pitch::to_semitones;
use crate::track::PitchTrack;

/// Detect onsets from jumps in the pitch track
///
/// The minimum interval is enforced globally: every returned pair of onsets is
/// at least `min_interval_seconds` apart. An all-unvoiced track yields no onsets.
///
/// # Example
///
/// ```
/// use onset_fusion::config::PitchOnsetConfig;
/// use onset_fusion::features::onset::pitch_jump::detect_pitch_onsets;
/// use onset_fusion::track::FrameTrack;
///
/// // 100 frames per second: A4 for 1 s, then C5 for 1 s
/// let hz: Vec<Option<f32>> = (0..200)
///     .map(|i| Some(if i < 100 { 440.0 } else { 523.25 }))
///     .collect();
/// let pitch = FrameTrack::new(hz, 441, 44100)?;
/// let onsets = detect_pitch_onsets(&pitch, &PitchOnsetConfig::default());
/// assert_eq!(onsets.len(), 1);
/// # Ok::<(), onset_fusion::AnalysisError>(())
/// ```
pub fn detect_pitch_onsets(pitch: &PitchTrack, config: &PitchOnsetConfig) -> Vec<OnsetCandidate> {
    let semitones = to_semitones(pitch, config.min_confident_hz);
    let times = semitones.times();
    let midi = semitones.values();

    let voiced = midi.iter().filter(|m| m.is_some()).count();
    if voiced == 0 {
        if !pitch.is_empty() {
            log::warn!(
                "Pitch track has no confident frames (>= {:.1} Hz) in {} frames",
                config.min_confident_hz,
                pitch.len()
            );
        }
        return Vec::new();
    }

    let mut onsets = Vec::new();
    let mut last_onset = f32::NEG_INFINITY;

    for (i, (&t_i, m_i)) in times.iter().zip(midi.iter()).enumerate() {
        let m_i = match m_i {
            Some(m) => *m,
            None => continue,
        };
        if t_i - last_onset < config.min_interval_seconds {
            continue;
        }

        for j in (0..i).rev() {
            if times[j] < t_i - config.lookback_seconds {
                break;
            }
            let Some(m_j) = midi[j] else {
                continue;
            };
            if (m_i - m_j).abs() > config.semitone_threshold {
                onsets.push(OnsetCandidate::new(t_i, OnsetSource::Pitch));
                last_onset = t_i;
                break;
            }
        }
    }

    log::debug!(
        "Pitch jumps: {}/{} confident frames, {} onsets (threshold={} semitones, lookback={}s)",
        voiced,
        pitch.len(),
        onsets.len(),
        config.semitone_threshold,
        config.lookback_seconds
    );

    onsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::FrameTrack;

    /// 100 frames per second
    fn pitch_track(hz: Vec<Option<f32>>) -> PitchTrack {
        FrameTrack::new(hz, 441, 44100).unwrap()
    }

    fn held(notes: &[(f32, usize)]) -> Vec<Option<f32>> {
        notes
            .iter()
            .flat_map(|&(hz, frames)| std::iter::repeat(Some(hz)).take(frames))
            .collect()
    }

    #[test]
    fn test_single_jump() {
        let pitch = pitch_track(held(&[(440.0, 100), (523.25, 100)]));
        let onsets = detect_pitch_onsets(&pitch, &PitchOnsetConfig::default());
        assert_eq!(onsets.len(), 1);
        assert!((onsets[0].time_seconds - 1.0).abs() < 1e-5);
        assert_eq!(onsets[0].source, OnsetSource::Pitch);
    }

    #[test]
    fn test_all_unvoiced() {
        let pitch = pitch_track(vec![None; 200]);
        assert!(detect_pitch_onsets(&pitch, &PitchOnsetConfig::default()).is_empty());

        let pitch = pitch_track(vec![]);
        assert!(detect_pitch_onsets(&pitch, &PitchOnsetConfig::default()).is_empty());
    }

    #[test]
    fn test_small_deviation_ignored() {
        // 440 -> 445 Hz is ~0.2 semitones
        let pitch = pitch_track(held(&[(440.0, 100), (445.0, 100)]));
        assert!(detect_pitch_onsets(&pitch, &PitchOnsetConfig::default()).is_empty());
    }

    #[test]
    fn test_below_floor_is_not_an_anchor() {
        // 300 Hz frames sit below the 350 Hz floor and cannot trigger a jump
        let pitch = pitch_track(held(&[(300.0, 100), (440.0, 100)]));
        assert!(detect_pitch_onsets(&pitch, &PitchOnsetConfig::default()).is_empty());
    }

    #[test]
    fn test_gap_beyond_lookback() {
        // Unvoiced gap longer than the lookback window separates the notes
        let mut hz = held(&[(440.0, 50)]);
        hz.extend(vec![None; 20]);
        hz.extend(held(&[(523.25, 50)]));
        let pitch = pitch_track(hz);
        assert!(detect_pitch_onsets(&pitch, &PitchOnsetConfig::default()).is_empty());
    }

    #[test]
    fn test_minimum_interval_is_global() {
        // Notes every 0.05 s, faster than the 0.15 s minimum interval
        let notes: Vec<(f32, usize)> = (0..20)
            .map(|i| (if i % 2 == 0 { 440.0 } else { 523.25 }, 5))
            .collect();
        let pitch = pitch_track(held(&notes));
        let onsets = detect_pitch_onsets(&pitch, &PitchOnsetConfig::default());

        assert!(!onsets.is_empty());
        for pair in onsets.windows(2) {
            assert!(
                pair[1].time_seconds - pair[0].time_seconds >= 0.15 - 1e-6,
                "Pitch onsets {:.3} and {:.3} are closer than the minimum interval",
                pair[0].time_seconds,
                pair[1].time_seconds
            );
        }
    }

    #[test]
    fn test_bend_then_jump() {
        // A4, then a 0.6 semitone bend, then a 2.4 semitone jump
        let pitch = pitch_track(held(&[(440.0, 50), (455.5, 50), (523.25, 50)]));
        let onsets = detect_pitch_onsets(&pitch, &PitchOnsetConfig::default());
        let times: Vec<f32> = onsets.iter().map(|o| o.time_seconds).collect();
        assert_eq!(times.len(), 2);
        assert!((times[0] - 0.5).abs() < 1e-5);
        assert!((times[1] - 1.0).abs() < 1e-5);
    }
}
