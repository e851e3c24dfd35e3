//! Error types for onset and note analysis

use std::fmt;

/// Errors that can occur during onset and note analysis
///
/// Degenerate but well-formed input (silence, an all-unvoiced pitch track,
/// no rising energy) is not an error: the affected stage returns an empty
/// result instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Caller contract violation (mismatched tracks, negative duration, bad parameters)
    InvalidInput(String),

    /// Processing environment failure (e.g. the batch thread pool could not be built)
    ProcessingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AnalysisError::InvalidInput("hop size must be > 0".to_string());
        assert_eq!(err.to_string(), "Invalid input: hop size must be > 0");

        let err = AnalysisError::ProcessingError("pool".to_string());
        assert_eq!(err.to_string(), "Processing error: pool");
    }
}
