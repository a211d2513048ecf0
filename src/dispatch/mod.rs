//! Work distribution
//!
//! Decides which rows each worker scans. Two interchangeable policies,
//! selected once per run:
//!
//! - [`StripePlan`]: static striping. Contiguous row ranges are computed
//!   before any worker starts; each worker independently knows its range and
//!   no coordination happens afterwards. Balanced by construction, except
//!   that the last worker absorbs the remainder of an uneven division.
//! - [`RowCursor`]: dynamic dispatch. Workers pull the next unclaimed row
//!   from a shared cursor, one lock acquisition per row. Self-balancing
//!   under uneven per-row cost.
//!
//! Both policies hand out every row in `[0, size)` exactly once.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Mutex;

/// Row-distribution policy for one reduction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Pre-assigned contiguous row ranges.
    Static,
    /// Rows pulled one at a time from a shared cursor.
    Dynamic,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Static
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Static => write!(f, "static"),
            Strategy::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Static striping: eager row-range assignment by worker index.
///
/// Worker `k` gets `[k * strip, (k + 1) * strip)` clamped to the grid size,
/// where `strip` is `size / workers` rounded up; the last worker's range
/// always runs through the final row. With more workers than rows the
/// surplus workers receive empty ranges, which is legitimate zero work, not
/// an error.
#[derive(Debug, Clone, Copy)]
pub struct StripePlan {
    size: usize,
    workers: usize,
    strip: usize,
}

impl StripePlan {
    /// Plan strips for `size` rows across `workers` workers.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is zero; configuration validation rejects that
    /// before a plan is ever built.
    pub fn new(size: usize, workers: usize) -> Self {
        assert!(workers > 0, "cannot stripe rows across zero workers");
        let strip = (size + workers - 1) / workers;
        Self { size, workers, strip }
    }

    /// Row range assigned to `worker`.
    pub fn range(&self, worker: usize) -> Range<usize> {
        assert!(worker < self.workers, "worker index out of range");
        let first = (worker * self.strip).min(self.size);
        let end = if worker + 1 == self.workers {
            // last worker absorbs the remainder
            self.size
        } else {
            (first + self.strip).min(self.size)
        };
        first..end
    }

    /// Number of workers in the plan.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Dynamic dispatch: a shared cursor over the unclaimed rows.
///
/// The read-and-increment is a single critical section; splitting it in two
/// would let workers claim the same row. Once every row has been handed out,
/// `claim` returns `None` without blocking.
#[derive(Debug)]
pub struct RowCursor {
    next: Mutex<usize>,
    total: usize,
}

impl RowCursor {
    /// Cursor over rows `[0, total)`.
    pub fn new(total: usize) -> Self {
        Self {
            next: Mutex::new(0),
            total,
        }
    }

    /// Claim the next unprocessed row, or `None` when all rows are taken.
    pub fn claim(&self) -> Option<usize> {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        if *next >= self.total {
            return None;
        }
        let row = *next;
        *next += 1;
        Some(row)
    }

    /// Total number of rows served by this cursor.
    pub fn total(&self) -> usize {
        self.total
    }
}
