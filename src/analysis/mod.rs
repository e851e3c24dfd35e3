//! Analysis results and batch processing
//!
//! - Result types
//! - Metadata
//! - Parallel batch analysis

pub mod batch;
pub mod metadata;
pub mod result;
