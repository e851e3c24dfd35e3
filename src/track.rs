//! Signals and frame-rate tracks
//!
//! A [`Signal`] borrows the caller's samples; a [`FrameTrack`] holds one value
//! per hop together with the frame timestamps, so frame index and time are
//! interchangeable through the hop size.

use crate::error::AnalysisError;

/// Mono audio samples at a fixed sample rate, borrowed from the caller
#[derive(Debug, Clone, Copy)]
pub struct Signal<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> Signal<'a> {
    /// Wrap caller-owned samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `sample_rate` is zero
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// The raw samples
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        (self.samples.len() as f64 / self.sample_rate as f64) as f32
    }
}

/// Ordered (time, value) pairs at a fixed hop size
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTrack<T> {
    values: Vec<T>,
    times: Vec<f32>,
    hop_size: usize,
    sample_rate: u32,
}

/// Frame-rate amplitude (or amplitude derivative) values
pub type AmplitudeTrack = FrameTrack<f32>;

/// Per-frame fundamental frequency in Hz, `None` where unvoiced
pub type PitchTrack = FrameTrack<Option<f32>>;

/// Per-frame MIDI-style semitone number, `None` where undefined
pub type SemitoneTrack = FrameTrack<Option<f32>>;

impl<T> FrameTrack<T> {
    /// Build a track whose frame `i` sits at `i * hop_size / sample_rate` seconds
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `hop_size` or `sample_rate` is zero
    pub fn new(values: Vec<T>, hop_size: usize, sample_rate: u32) -> Result<Self, AnalysisError> {
        if hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }

        let times = (0..values.len())
            .map(|i| frame_to_time(i, hop_size, sample_rate))
            .collect();

        Ok(Self {
            values,
            times,
            hop_size,
            sample_rate,
        })
    }

    /// Frame values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Frame timestamps in seconds, strictly increasing
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Samples between frames
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Sample rate the hop refers to
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the track has no frames
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamp of frame `index`, whether or not the frame exists
    pub fn time_at(&self, index: usize) -> f32 {
        frame_to_time(index, self.hop_size, self.sample_rate)
    }

    /// Iterate `(time, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f32, &T)> + '_ {
        self.times.iter().copied().zip(self.values.iter())
    }

    /// Index of the frame closest to `time`, earliest frame on ties
    pub fn nearest_frame(&self, time: f32) -> Option<usize> {
        if self.times.is_empty() {
            return None;
        }

        let idx = self.times.partition_point(|&t| t < time);
        if idx == 0 {
            return Some(0);
        }
        if idx == self.times.len() {
            return Some(idx - 1);
        }

        let before = time - self.times[idx - 1];
        let after = self.times[idx] - time;
        if after < before {
            Some(idx)
        } else {
            Some(idx - 1)
        }
    }

    /// Frame indices whose time lies in `[start, end]`
    pub fn frames_between(&self, start: f32, end: f32) -> std::ops::Range<usize> {
        let first = self.times.partition_point(|&t| t < start);
        let last = self.times.partition_point(|&t| t <= end);
        first..last.max(first)
    }

    /// True if both tracks share sample rate, hop size and frame count
    pub fn is_aligned_with<U>(&self, other: &FrameTrack<U>) -> bool {
        self.sample_rate == other.sample_rate
            && self.hop_size == other.hop_size
            && self.len() == other.len()
    }

    /// Build a track on the same frame grid with transformed values
    pub fn map<U, F>(&self, f: F) -> FrameTrack<U>
    where
        F: FnMut(&T) -> U,
    {
        FrameTrack {
            values: self.values.iter().map(f).collect(),
            times: self.times.clone(),
            hop_size: self.hop_size,
            sample_rate: self.sample_rate,
        }
    }
}

impl<T> FrameTrack<T> {
    /// Same frame grid, new values; `values` must have one entry per frame
    pub(crate) fn with_values<U>(&self, values: Vec<U>) -> FrameTrack<U> {
        debug_assert_eq!(values.len(), self.values.len());
        FrameTrack {
            values,
            times: self.times.clone(),
            hop_size: self.hop_size,
            sample_rate: self.sample_rate,
        }
    }
}

fn frame_to_time(index: usize, hop_size: usize, sample_rate: u32) -> f32 {
    (index as f64 * hop_size as f64 / sample_rate as f64) as f32
}
