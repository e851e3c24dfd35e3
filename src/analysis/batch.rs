//! Parallel batch analysis
//!
//! Analyses are independent pure computations, so a batch of recordings is
//! spread over a dedicated rayon thread pool with no shared state.

use rayon::prelude::*;

use super::result::NoteAnalysis;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::FeatureProvider;
use crate::track::Signal;

/// One recording and its upstream features
#[derive(Debug, Clone, Copy)]
pub struct BatchItem<'a, P> {
    /// Recording samples
    pub signal: Signal<'a>,

    /// Upstream spectral onsets and pitch track for `signal`
    pub features: &'a P,
}

/// Analyze many recordings in parallel
///
/// # Arguments
///
/// * `items` - Recordings with their features
/// * `config` - Shared analysis configuration
/// * `jobs` - Worker threads, `None` for one per logical CPU
///
/// # Returns
///
/// One result per item, in input order. A failing item does not affect the others.
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the thread pool cannot be built
pub fn analyze_batch<P>(
    items: &[BatchItem<'_, P>],
    config: &AnalysisConfig,
    jobs: Option<usize>,
) -> Result<Vec<Result<NoteAnalysis, AnalysisError>>, AnalysisError>
where
    P: FeatureProvider + Sync,
{
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs.max(1));
    }
    let pool = builder.build().map_err(|e| {
        AnalysisError::ProcessingError(format!("Failed to build thread pool: {}", e))
    })?;

    log::debug!(
        "Batch: {} recordings on {} threads",
        items.len(),
        pool.current_num_threads()
    );

    let results: Vec<Result<NoteAnalysis, AnalysisError>> = pool.install(|| {
        items
            .par_iter()
            .map(|item| crate::analyze_notes(&item.signal, item.features, config))
            .collect()
    });

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!("Batch: {}/{} recordings failed", failed, results.len());
    }

    Ok(results)
}
