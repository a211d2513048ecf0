//! Scan statistics
//!
//! Per-worker accumulators and the merge operation that combines them.
//!
//! Each worker owns exactly one [`ScanStats`] while scanning; nothing is
//! shared, so recording is plain field updates with no synchronization. Once
//! a worker finishes its assigned rows the accumulator is published (thread
//! return value or a shared slot) and becomes read-only.
//!
//! # Tie-break rule
//!
//! The first-encountered element wins: `observe` replaces an extremum only
//! on a strictly smaller (or strictly larger) value, and `merge` keeps the
//! receiver's extremum on equal values. Merging partials in ascending
//! worker-index order therefore yields the row-major-first extremum for
//! striped scans, and a deterministic extremum *value* for any scan order.

pub mod aggregator;

use serde::Serialize;

/// A cell value together with its position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extremum {
    pub value: i32,
    pub row: usize,
    pub col: usize,
}

/// Aggregate statistics over a set of scanned rows.
///
/// Also the shape of the final result: the reducer folds worker partials
/// into one `ScanStats` for the whole grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Sum of all scanned cells. 64-bit so a full-size grid of maximal
    /// values cannot overflow.
    pub sum: i64,
    /// Smallest scanned value and where it was first seen. `None` until at
    /// least one cell has been observed.
    pub min: Option<Extremum>,
    /// Largest scanned value and where it was first seen.
    pub max: Option<Extremum>,
    /// Number of rows scanned.
    pub rows: u64,
    /// Number of cells scanned.
    pub cells: u64,
}

impl ScanStats {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cell.
    ///
    /// Strict comparisons keep the first-encountered element on ties.
    #[inline]
    pub fn observe(&mut self, value: i32, row: usize, col: usize) {
        self.sum += i64::from(value);
        self.cells += 1;
        match self.min {
            Some(min) if value >= min.value => {}
            _ => self.min = Some(Extremum { value, row, col }),
        }
        match self.max {
            Some(max) if value <= max.value => {}
            _ => self.max = Some(Extremum { value, row, col }),
        }
    }

    /// Mark one assigned row as fully scanned.
    #[inline]
    pub fn finish_row(&mut self) {
        self.rows += 1;
    }

    /// Fold another partial into this one.
    ///
    /// On equal extremum values the receiver wins, so folding in ascending
    /// worker-index order implements the cross-worker tie policy.
    pub fn merge(&mut self, other: &ScanStats) {
        self.sum += other.sum;
        self.rows += other.rows;
        self.cells += other.cells;
        if let Some(theirs) = other.min {
            match self.min {
                Some(ours) if ours.value <= theirs.value => {}
                _ => self.min = Some(theirs),
            }
        }
        if let Some(theirs) = other.max {
            match self.max {
                Some(ours) if ours.value >= theirs.value => {}
                _ => self.max = Some(theirs),
            }
        }
    }

    /// True if no cells were scanned.
    pub fn is_empty(&self) -> bool {
        self.cells == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let stats = ScanStats::new();
        assert_eq!(stats.sum, 0);
        assert!(stats.min.is_none());
        assert!(stats.max.is_none());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_observe_single() {
        let mut stats = ScanStats::new();
        stats.observe(5, 0, 0);
        assert_eq!(stats.sum, 5);
        assert_eq!(stats.min, Some(Extremum { value: 5, row: 0, col: 0 }));
        assert_eq!(stats.max, Some(Extremum { value: 5, row: 0, col: 0 }));
        assert_eq!(stats.cells, 1);
    }

    #[test]
    fn test_observe_tracks_extrema_positions() {
        let mut stats = ScanStats::new();
        stats.observe(5, 0, 0);
        stats.observe(1, 0, 1);
        stats.observe(3, 1, 0);
        stats.observe(9, 1, 1);
        assert_eq!(stats.sum, 18);
        assert_eq!(stats.min, Some(Extremum { value: 1, row: 0, col: 1 }));
        assert_eq!(stats.max, Some(Extremum { value: 9, row: 1, col: 1 }));
    }

    #[test]
    fn test_observe_first_wins_on_tie() {
        let mut stats = ScanStats::new();
        stats.observe(1, 0, 0);
        stats.observe(1, 0, 1);
        stats.observe(1, 2, 2);
        assert_eq!(stats.min, Some(Extremum { value: 1, row: 0, col: 0 }));
        assert_eq!(stats.max, Some(Extremum { value: 1, row: 0, col: 0 }));
    }

    #[test]
    fn test_observe_negative_values() {
        let mut stats = ScanStats::new();
        stats.observe(-4, 0, 0);
        stats.observe(-9, 0, 1);
        stats.observe(2, 0, 2);
        assert_eq!(stats.sum, -11);
        assert_eq!(stats.min.unwrap().value, -9);
        assert_eq!(stats.max.unwrap().value, 2);
    }

    #[test]
    fn test_merge_sums_and_extrema() {
        let mut a = ScanStats::new();
        a.observe(5, 0, 0);
        a.observe(1, 0, 1);
        a.finish_row();

        let mut b = ScanStats::new();
        b.observe(3, 1, 0);
        b.observe(9, 1, 1);
        b.finish_row();

        a.merge(&b);
        assert_eq!(a.sum, 18);
        assert_eq!(a.rows, 2);
        assert_eq!(a.cells, 4);
        assert_eq!(a.min.unwrap().value, 1);
        assert_eq!(a.max, Some(Extremum { value: 9, row: 1, col: 1 }));
    }

    #[test]
    fn test_merge_receiver_wins_on_tie() {
        let mut a = ScanStats::new();
        a.observe(1, 0, 0);
        let mut b = ScanStats::new();
        b.observe(1, 7, 7);

        a.merge(&b);
        assert_eq!(a.min, Some(Extremum { value: 1, row: 0, col: 0 }));
        assert_eq!(a.max, Some(Extremum { value: 1, row: 0, col: 0 }));
    }

    #[test]
    fn test_merge_empty_into_full() {
        let mut a = ScanStats::new();
        a.observe(4, 2, 3);
        let b = ScanStats::new();
        a.merge(&b);
        assert_eq!(a.sum, 4);
        assert_eq!(a.min.unwrap().value, 4);
    }

    #[test]
    fn test_merge_full_into_empty() {
        let mut a = ScanStats::new();
        let mut b = ScanStats::new();
        b.observe(4, 2, 3);
        a.merge(&b);
        assert_eq!(a.sum, 4);
        assert_eq!(a.max, Some(Extremum { value: 4, row: 2, col: 3 }));
    }
}
