//! Dense 2-D integer grid
//!
//! The grid is built once by the coordinator and never mutated afterwards;
//! workers only ever hold shared references to it, so no locking is needed
//! during the scan phase.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Square matrix of `i32` values in row-major order.
///
/// `size == 0` is a valid (empty) grid: a reduction over it yields sum 0 and
/// no extrema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Create a grid with every cell set to `value`.
    pub fn filled(size: usize, value: i32) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    /// Create a grid where cell `(row, col)` is `f(row, col)`.
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i32,
    {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(row, col));
            }
        }
        Self { size, cells }
    }

    /// Create a grid of uniform random values in `[0, max_value)`.
    ///
    /// A `seed` makes the grid reproducible across runs; `None` seeds from
    /// OS entropy.
    ///
    /// # Panics
    ///
    /// Panics if `max_value` is not positive (the value range would be
    /// empty); configuration validation rejects that before a grid is
    /// built.
    pub fn random(size: usize, max_value: i32, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };
        Self::from_fn(size, |_, _| rng.gen_range(0..max_value))
    }

    /// Build a square grid from explicit rows (test fixtures).
    ///
    /// # Panics
    ///
    /// Panics if the rows do not form a `len × len` square.
    pub fn from_rows(rows: &[&[i32]]) -> Self {
        let size = rows.len();
        assert!(
            rows.iter().all(|r| r.len() == size),
            "grid rows must form a square"
        );
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            cells.extend_from_slice(row);
        }
        Self { size, cells }
    }

    /// Grid dimension (rows == cols).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> u64 {
        (self.size * self.size) as u64
    }

    /// One row as a contiguous slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[i32] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Single cell value.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.cells[row * self.size + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled() {
        let grid = Grid::filled(3, 7);
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.cell_count(), 9);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(grid.get(row, col), 7);
            }
        }
    }

    #[test]
    fn test_from_fn_row_major() {
        let grid = Grid::from_fn(3, |row, col| (row * 10 + col) as i32);
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(1, 2), 12);
        assert_eq!(grid.row(2), &[20, 21, 22]);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[&[5, 1], &[3, 9]]);
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.get(0, 1), 1);
        assert_eq!(grid.get(1, 1), 9);
    }

    #[test]
    #[should_panic(expected = "square")]
    fn test_from_rows_rejects_ragged() {
        Grid::from_rows(&[&[1, 2], &[3]]);
    }

    #[test]
    fn test_random_within_bounds() {
        let grid = Grid::random(16, 100, Some(42));
        for row in 0..16 {
            for &v in grid.row(row) {
                assert!((0..100).contains(&v));
            }
        }
    }

    #[test]
    fn test_random_seed_reproducible() {
        let a = Grid::random(8, 1000, Some(7));
        let b = Grid::random(8, 1000, Some(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::filled(0, 0);
        assert_eq!(grid.size(), 0);
        assert_eq!(grid.cell_count(), 0);
    }
}
