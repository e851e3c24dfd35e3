//! Pitch track conversion
//!
//! Maps an externally estimated fundamental-frequency track onto the MIDI
//! semitone scale, dropping frames that are unvoiced or below a confidence floor.

use crate::track::{PitchTrack, SemitoneTrack};

/// Reference pitch (A4) in Hz
pub const A4_HZ: f32 = 440.0;

/// MIDI note number of A4
pub const MIDI_A4: f32 = 69.0;

/// Convert a frequency in Hz to a fractional MIDI note number
///
/// Returns `None` for non-positive or non-finite input.
///
/// # Example
///
/// ```
/// use onset_fusion::features::pitch::hz_to_midi;
///
/// assert_eq!(hz_to_midi(440.0), Some(69.0));
/// assert_eq!(hz_to_midi(0.0), None);
/// ```
pub fn hz_to_midi(hz: f32) -> Option<f32> {
    if hz.is_finite() && hz > 0.0 {
        Some(MIDI_A4 + 12.0 * (hz / A4_HZ).log2())
    } else {
        None
    }
}

/// Convert a pitch track to semitones
///
/// Frames that are unvoiced, non-finite, or below `min_confident_hz` become
/// `None` so they never serve as comparison anchors.
pub fn to_semitones(pitch: &PitchTrack, min_confident_hz: f32) -> SemitoneTrack {
    pitch.map(|hz| match *hz {
        Some(f) if f.is_finite() && f >= min_confident_hz => hz_to_midi(f),
        _ => None,
    })
}
