//! Coordinator
//!
//! Orchestrates one reduction pass: owns the grid, selects the distribution
//! strategy and the reduce placement, spawns the worker pool, measures
//! elapsed wall-clock time, and returns the final result as plain data.
//!
//! Workers run as named OS threads inside a `crossbeam` scope so they can
//! borrow the grid directly. Thread-creation failure is fatal: the start
//! gate is aborted, already-spawned workers exit before touching the
//! barrier, and the error names the worker index that could not be spawned.

use crate::config::{Config, ConfigError};
use crate::dispatch::{RowCursor, Strategy, StripePlan};
use crate::grid::Grid;
use crate::stats::aggregator::ReduceAggregator;
use crate::stats::ScanStats;
use crate::sync::{CountingBarrier, StartGate};
use crate::util::time::Timestamp;
use crate::worker::{Assignment, Worker};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// Where the cross-worker reduce runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceMode {
    /// Worker 0 reduces after all workers cross the barrier. Static
    /// striping only.
    Barrier,
    /// The coordinator reduces after joining every worker thread.
    Join,
}

impl Default for ReduceMode {
    fn default() -> Self {
        Self::Join
    }
}

impl std::fmt::Display for ReduceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReduceMode::Barrier => write!(f, "barrier"),
            ReduceMode::Join => write!(f, "join"),
        }
    }
}

/// Everything a completed reduction pass produced.
#[derive(Debug, Clone)]
pub struct ReductionReport {
    /// Combined result for the whole grid
    pub result: ScanStats,
    /// Per-worker partials, indexed by worker
    pub per_worker: Vec<ScanStats>,
    /// Wall-clock time from worker spawn to final result
    pub elapsed: Duration,
    /// Worker count the pass ran with
    pub workers: usize,
    pub strategy: Strategy,
    pub reduce_mode: ReduceMode,
}

/// What one worker thread hands back through its join handle.
struct WorkerOutput {
    partial: ScanStats,
    /// `Some` only for worker 0 in barrier mode
    reduced: Option<ScanStats>,
}

/// Runs reduction passes over a grid it owns.
pub struct Coordinator {
    config: Config,
    grid: Grid,
}

impl Coordinator {
    pub fn new(config: Config, grid: Grid) -> Self {
        Self { config, grid }
    }

    /// The grid under reduction (sequential verification, tests).
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Execute one reduction pass.
    ///
    /// Repeated calls over the unmodified grid yield identical results.
    pub fn run(&self) -> Result<ReductionReport> {
        let workers = self.config.run.workers;
        let strategy = self.config.run.strategy;
        let reduce_mode = self.config.run.reduce;
        let size = self.grid.size();

        if workers == 0 {
            return Err(ConfigError::WorkersOutOfBounds {
                workers,
                max: crate::config::MAX_WORKERS,
            }
            .into());
        }
        if reduce_mode == ReduceMode::Barrier && strategy != Strategy::Static {
            return Err(ConfigError::BarrierNeedsStatic.into());
        }

        let plan = StripePlan::new(size, workers);
        let cursor = RowCursor::new(size);
        let barrier = CountingBarrier::new(workers);
        let gate = StartGate::new();
        // publication slots for barrier mode, one per worker
        let slots: Mutex<Vec<Option<ScanStats>>> = Mutex::new(vec![None; workers]);

        if self.config.runtime.debug {
            eprintln!(
                "DEBUG: spawning {} workers ({} strategy, {} reduce) over {}x{} grid",
                workers, strategy, reduce_mode, size, size
            );
        }

        let started = Timestamp::now();

        let outputs = crossbeam::thread::scope(|s| -> Result<Vec<WorkerOutput>> {
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let assignment = match strategy {
                    Strategy::Static => Assignment::Strip(plan.range(id)),
                    Strategy::Dynamic => Assignment::Shared(&cursor),
                };
                let grid = &self.grid;
                let gate = &gate;
                let barrier = &barrier;
                let slots = &slots;

                let spawned = s
                    .builder()
                    .name(format!("scan-{}", id))
                    .spawn(move |_| {
                        if !gate.wait() {
                            // spawn of a later worker failed; exit untouched
                            return WorkerOutput {
                                partial: ScanStats::new(),
                                reduced: None,
                            };
                        }

                        let partial = Worker::new(id, grid, assignment).run();

                        match reduce_mode {
                            ReduceMode::Join => WorkerOutput {
                                partial,
                                reduced: None,
                            },
                            ReduceMode::Barrier => {
                                {
                                    let mut slots =
                                        slots.lock().unwrap_or_else(|e| e.into_inner());
                                    slots[id] = Some(partial.clone());
                                }
                                barrier.arrive_and_wait();
                                // the barrier orders every publication above
                                // before this read
                                let reduced = (id == 0).then(|| {
                                    let mut slots =
                                        slots.lock().unwrap_or_else(|e| e.into_inner());
                                    let mut aggregator = ReduceAggregator::new();
                                    for (worker, slot) in slots.iter_mut().enumerate() {
                                        let stats = slot
                                            .take()
                                            .expect("partial published before barrier");
                                        aggregator.add_worker(worker, stats);
                                    }
                                    aggregator.aggregate()
                                });
                                WorkerOutput { partial, reduced }
                            }
                        }
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        gate.abort();
                        for handle in handles {
                            let _ = handle.join();
                        }
                        return Err(e).with_context(|| format!("failed to spawn worker {}", id));
                    }
                }
            }

            gate.open();

            handles
                .into_iter()
                .enumerate()
                .map(|(id, handle)| {
                    handle
                        .join()
                        .map_err(|_| anyhow::anyhow!("worker {} panicked", id))
                })
                .collect()
        })
        .map_err(|_| anyhow::anyhow!("worker scope panicked"))??;

        let result = match reduce_mode {
            ReduceMode::Barrier => outputs[0]
                .reduced
                .clone()
                .expect("worker 0 reduces in barrier mode"),
            ReduceMode::Join => {
                let mut aggregator = ReduceAggregator::new();
                for (id, output) in outputs.iter().enumerate() {
                    aggregator.add_worker(id, output.partial.clone());
                }
                aggregator.aggregate()
            }
        };
        let elapsed = started.elapsed();

        if self.config.runtime.debug {
            eprintln!("DEBUG: pass complete in {:.3}s", elapsed.as_secs_f64());
        }

        Ok(ReductionReport {
            result,
            per_worker: outputs.into_iter().map(|o| o.partial).collect(),
            elapsed,
            workers,
            strategy,
            reduce_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, GridConfig, RunConfig};
    use crate::worker::sequential_scan;

    fn config_for(workers: usize, strategy: Strategy, reduce: ReduceMode) -> Config {
        Config {
            grid: GridConfig {
                size: 0, // grid is supplied directly in these tests
                ..GridConfig::default()
            },
            run: RunConfig {
                workers,
                strategy,
                reduce,
            },
            ..Config::default()
        }
    }

    fn run_pass(
        grid: &Grid,
        workers: usize,
        strategy: Strategy,
        reduce: ReduceMode,
    ) -> ReductionReport {
        let coordinator = Coordinator::new(config_for(workers, strategy, reduce), grid.clone());
        coordinator.run().unwrap()
    }

    #[test]
    fn test_matches_sequential_reference() {
        let grid = Grid::random(31, 1000, Some(11));
        let reference = sequential_scan(&grid);

        for workers in [1, 2, 3, 4, 7] {
            for (strategy, reduce) in [
                (Strategy::Static, ReduceMode::Barrier),
                (Strategy::Static, ReduceMode::Join),
                (Strategy::Dynamic, ReduceMode::Join),
            ] {
                let report = run_pass(&grid, workers, strategy, reduce);
                assert_eq!(
                    report.result.sum, reference.sum,
                    "sum, workers={} {strategy}/{reduce}",
                    workers
                );
                assert_eq!(
                    report.result.min.unwrap().value,
                    reference.min.unwrap().value,
                    "min, workers={} {strategy}/{reduce}",
                    workers
                );
                assert_eq!(
                    report.result.max.unwrap().value,
                    reference.max.unwrap().value,
                    "max, workers={} {strategy}/{reduce}",
                    workers
                );
            }
        }
    }

    #[test]
    fn test_static_positions_match_reference() {
        // unique extrema: positions are deterministic for every strategy
        let grid = Grid::from_fn(9, |row, col| (row * 9 + col) as i32);
        let reference = sequential_scan(&grid);

        for reduce in [ReduceMode::Barrier, ReduceMode::Join] {
            let report = run_pass(&grid, 4, Strategy::Static, reduce);
            assert_eq!(report.result.min, reference.min);
            assert_eq!(report.result.max, reference.max);
        }
    }

    #[test]
    fn test_strategy_equivalence() {
        let grid = Grid::random(25, 500, Some(3));
        let fixed = run_pass(&grid, 5, Strategy::Static, ReduceMode::Join);
        let pulled = run_pass(&grid, 5, Strategy::Dynamic, ReduceMode::Join);

        assert_eq!(fixed.result.sum, pulled.result.sum);
        assert_eq!(
            fixed.result.min.unwrap().value,
            pulled.result.min.unwrap().value
        );
        assert_eq!(
            fixed.result.max.unwrap().value,
            pulled.result.max.unwrap().value
        );
    }

    #[test]
    fn test_idempotent_across_repeated_runs() {
        let grid = Grid::random(16, 1000, Some(9));
        let coordinator = Coordinator::new(
            config_for(4, Strategy::Static, ReduceMode::Barrier),
            grid,
        );

        let first = coordinator.run().unwrap();
        for _ in 0..3 {
            let again = coordinator.run().unwrap();
            assert_eq!(again.result, first.result);
        }
    }

    #[test]
    fn test_all_ones_scenario() {
        // 4x4 of ones, two striped workers: sum 16, extrema at the first
        // scanned position
        let grid = Grid::filled(4, 1);
        let report = run_pass(&grid, 2, Strategy::Static, ReduceMode::Barrier);

        assert_eq!(report.result.sum, 16);
        let min = report.result.min.unwrap();
        let max = report.result.max.unwrap();
        assert_eq!((min.value, min.row, min.col), (1, 0, 0));
        assert_eq!((max.value, max.row, max.col), (1, 0, 0));
    }

    #[test]
    fn test_more_workers_than_rows_scenario() {
        let grid = Grid::from_rows(&[&[5, 1], &[3, 9]]);
        let report = run_pass(&grid, 4, Strategy::Dynamic, ReduceMode::Join);

        assert_eq!(report.result.sum, 18);
        let min = report.result.min.unwrap();
        let max = report.result.max.unwrap();
        assert_eq!((min.value, min.row, min.col), (1, 0, 1));
        assert_eq!((max.value, max.row, max.col), (9, 1, 1));
        assert_eq!(report.per_worker.len(), 4);
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = Grid::filled(1, 42);
        let report = run_pass(&grid, 1, Strategy::Static, ReduceMode::Join);

        assert_eq!(report.result.sum, 42);
        assert_eq!(report.result.min.unwrap().value, 42);
        assert_eq!((report.result.max.unwrap().row, report.result.max.unwrap().col), (0, 0));
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::filled(0, 0);
        for (strategy, reduce) in [
            (Strategy::Static, ReduceMode::Barrier),
            (Strategy::Dynamic, ReduceMode::Join),
        ] {
            let report = run_pass(&grid, 3, strategy, reduce);
            assert_eq!(report.result.sum, 0);
            assert!(report.result.min.is_none());
            assert!(report.result.max.is_none());
        }
    }

    #[test]
    fn test_surplus_workers_do_zero_work() {
        let grid = Grid::filled(2, 1);
        let report = run_pass(&grid, 8, Strategy::Static, ReduceMode::Barrier);

        assert_eq!(report.result.sum, 4);
        let busy: Vec<_> = report.per_worker.iter().filter(|p| !p.is_empty()).collect();
        assert_eq!(busy.len(), 2);
    }

    #[test]
    fn test_per_worker_rows_cover_grid() {
        let grid = Grid::filled(10, 1);
        for strategy in [Strategy::Static, Strategy::Dynamic] {
            let report = run_pass(&grid, 3, strategy, ReduceMode::Join);
            let rows: u64 = report.per_worker.iter().map(|p| p.rows).sum();
            assert_eq!(rows, 10, "{strategy}");
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        let grid = Grid::filled(4, 1);
        let coordinator =
            Coordinator::new(config_for(0, Strategy::Static, ReduceMode::Join), grid);
        assert!(coordinator.run().is_err());
    }

    #[test]
    fn test_barrier_with_dynamic_rejected() {
        let grid = Grid::filled(4, 1);
        let coordinator =
            Coordinator::new(config_for(2, Strategy::Dynamic, ReduceMode::Barrier), grid);
        assert!(coordinator.run().is_err());
    }
}
