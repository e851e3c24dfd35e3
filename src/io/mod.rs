//! Inputs from upstream collaborators
//!
//! Audio decoding and feature estimation happen outside this crate; this
//! module defines how their results are handed in.

pub mod upstream;

pub use upstream::{FeatureProvider, PrecomputedFeatures};
