//! Worker scan loop
//!
//! The worker is the execution unit of a reduction pass. Each worker owns a
//! strongly-typed context (its index, its row assignment, a shared reference
//! to the grid) and an exclusive [`ScanStats`] accumulator. During the scan
//! phase workers share no mutable state; with dynamic dispatch the only
//! cross-thread traffic is the row cursor's critical section.
//!
//! A worker scans its rows left to right in row-major order and returns its
//! finished accumulator. What happens next belongs to the coordinator:
//! either the partial is published into a shared slot ahead of a barrier, or
//! it travels back through the thread's join handle.

use crate::dispatch::RowCursor;
use crate::grid::Grid;
use crate::stats::ScanStats;
use std::ops::Range;

/// Row assignment handed to a worker at spawn time.
#[derive(Debug)]
pub enum Assignment<'a> {
    /// Static striping: a pre-computed contiguous row range.
    Strip(Range<usize>),
    /// Dynamic dispatch: a handle to the shared row cursor.
    Shared(&'a RowCursor),
}

/// One worker of the reduction pool.
#[derive(Debug)]
pub struct Worker<'a> {
    /// Worker index (reduction tie-break order, thread naming)
    id: usize,
    /// Read-shared grid
    grid: &'a Grid,
    /// Rows this worker scans
    assignment: Assignment<'a>,
    /// Exclusively owned accumulator
    stats: ScanStats,
}

impl<'a> Worker<'a> {
    pub fn new(id: usize, grid: &'a Grid, assignment: Assignment<'a>) -> Self {
        Self {
            id,
            grid,
            assignment,
            stats: ScanStats::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Scan all assigned rows and return the finished accumulator.
    ///
    /// A worker with an empty strip (more workers than rows) legitimately
    /// returns an empty accumulator.
    pub fn run(self) -> ScanStats {
        let Worker {
            grid,
            assignment,
            mut stats,
            ..
        } = self;

        match assignment {
            Assignment::Strip(range) => {
                for row in range {
                    scan_row(grid, row, &mut stats);
                }
            }
            Assignment::Shared(cursor) => {
                // claim under the lock, scan outside it
                while let Some(row) = cursor.claim() {
                    scan_row(grid, row, &mut stats);
                }
            }
        }

        stats
    }
}

/// Single-threaded reference scan of the whole grid.
///
/// The parallel reduction must agree with this on sum and extremum values
/// for any worker count and strategy; used by `--verify` and the tests.
pub fn sequential_scan(grid: &Grid) -> ScanStats {
    let mut stats = ScanStats::new();
    for row in 0..grid.size() {
        scan_row(grid, row, &mut stats);
    }
    stats
}

/// Scan one row, columns left to right.
fn scan_row(grid: &Grid, row: usize, stats: &mut ScanStats) {
    for (col, &value) in grid.row(row).iter().enumerate() {
        stats.observe(value, row, col);
    }
    stats.finish_row();
}
