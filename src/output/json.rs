//! JSON output formatting
//!
//! Serializes a completed pass to a JSON document mirroring the text
//! report: grid shape, run parameters, final result, elapsed time, scan
//! rate, and (optionally) the per-worker breakdown.

use crate::config::Config;
use crate::coordinator::ReductionReport;
use crate::stats::{Extremum, ScanStats};
use crate::util::time::{calculate_rate, format_duration};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Grid shape section
#[derive(Debug, Clone, Serialize)]
pub struct JsonGrid {
    pub size: usize,
    pub cells: u64,
}

/// Run parameter section
#[derive(Debug, Clone, Serialize)]
pub struct JsonRun {
    pub workers: usize,
    pub strategy: String,
    pub reduce: String,
}

/// Final result section
#[derive(Debug, Clone, Serialize)]
pub struct JsonResult {
    pub sum: i64,
    pub min: Option<Extremum>,
    pub max: Option<Extremum>,
}

impl From<&ScanStats> for JsonResult {
    fn from(stats: &ScanStats) -> Self {
        Self {
            sum: stats.sum,
            min: stats.min,
            max: stats.max,
        }
    }
}

/// Per-worker entry
#[derive(Debug, Clone, Serialize)]
pub struct JsonWorker {
    pub worker: usize,
    pub rows: u64,
    pub cells: u64,
    pub sum: i64,
    pub min: Option<Extremum>,
    pub max: Option<Extremum>,
}

/// Complete JSON report document
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub grid: JsonGrid,
    pub run: JsonRun,
    pub result: JsonResult,
    pub elapsed: JsonDuration,
    pub cells_per_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_worker: Option<Vec<JsonWorker>>,
}

impl JsonReport {
    /// Build the document from a completed pass.
    pub fn build(report: &ReductionReport, config: &Config) -> Self {
        let per_worker = config.output.per_worker.then(|| {
            report
                .per_worker
                .iter()
                .enumerate()
                .map(|(worker, partial)| JsonWorker {
                    worker,
                    rows: partial.rows,
                    cells: partial.cells,
                    sum: partial.sum,
                    min: partial.min,
                    max: partial.max,
                })
                .collect()
        });

        Self {
            grid: JsonGrid {
                size: config.grid.size,
                cells: report.result.cells,
            },
            run: JsonRun {
                workers: report.workers,
                strategy: report.strategy.to_string(),
                reduce: report.reduce_mode.to_string(),
            },
            result: JsonResult::from(&report.result),
            elapsed: JsonDuration::from_duration(report.elapsed),
            cells_per_sec: calculate_rate(report.result.cells, report.elapsed),
            per_worker,
        }
    }
}

/// Write the JSON report to a file.
pub fn write_json_report(path: &Path, report: &ReductionReport, config: &Config) -> Result<()> {
    let document = JsonReport::build(report, config);
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, &document)
        .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
    Ok(())
}
