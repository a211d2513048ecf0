//! Partial-result reduction
//!
//! Collects per-worker [`ScanStats`] and folds them into the final result.
//! The fold visits partials in ascending worker-index order so that
//! cross-worker extremum ties resolve to the lowest worker index, which for
//! striped assignments is the row-major-first occurrence.
//!
//! The reducer is a pure fold with no side effects; it runs either inside
//! worker 0 after the barrier, or inside the coordinator after joining all
//! worker threads. Both placements see fully written partials because the
//! barrier (or the join) is a happens-before edge.

use crate::stats::ScanStats;
use std::collections::HashMap;

/// Reduces partial results from multiple workers into one final result.
///
/// # Usage
///
/// 1. Create with `new()`
/// 2. Add each worker's partial with `add_worker()`
/// 3. Read the combined result with `aggregate()`
#[derive(Debug, Default)]
pub struct ReduceAggregator {
    /// Per-worker partials (worker index → stats)
    workers: HashMap<usize, ScanStats>,
}

impl ReduceAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the partial result produced by one worker.
    ///
    /// Re-adding the same index replaces the previous partial.
    pub fn add_worker(&mut self, worker_index: usize, stats: ScanStats) {
        self.workers.insert(worker_index, stats);
    }

    /// Number of partials added so far.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Worker indices in ascending order.
    pub fn worker_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.workers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Partial result for one worker, if present.
    pub fn worker_stats(&self, worker_index: usize) -> Option<&ScanStats> {
        self.workers.get(&worker_index)
    }

    /// Fold all partials into the final result.
    ///
    /// An aggregator with no partials (or only empty ones) yields an empty
    /// `ScanStats`: sum 0 and no extrema.
    pub fn aggregate(&self) -> ScanStats {
        let mut total = ScanStats::new();
        for id in self.worker_ids() {
            total.merge(&self.workers[&id]);
        }
        total
    }

    /// Partials in ascending worker-index order (per-worker reporting).
    pub fn into_sorted(self) -> Vec<(usize, ScanStats)> {
        let mut entries: Vec<(usize, ScanStats)> = self.workers.into_iter().collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }
}
