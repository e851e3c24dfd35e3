//! Feature extraction modules
//!
//! This module contains the analysis stages:
//! - Amplitude envelope
//! - Pitch track conversion
//! - Onset detection (energy, pitch jumps, consensus, classification)
//! - Note segmentation

pub mod envelope;
pub mod onset;
pub mod pitch;
pub mod segmentation;
