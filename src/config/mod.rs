//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod toml;
pub mod validator;

use crate::coordinator::ReduceMode;
use crate::dispatch::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Maximum grid dimension a run will accept.
pub const MAX_GRID_SIZE: usize = 25_000;

/// Maximum number of worker threads.
pub const MAX_WORKERS: usize = 128;

/// Largest grid `--print-matrix` will dump to the terminal.
pub const MAX_PRINTABLE_SIZE: usize = 32;

/// Grid dimension used when neither CLI nor config file specify one.
pub const DEFAULT_GRID_SIZE: usize = 1_000;

/// Default exclusive upper bound for random cell values.
pub const DEFAULT_MAX_VALUE: i32 = 1_000;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Grid construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid dimension (rows == cols)
    #[serde(default = "default_size")]
    pub size: usize,
    /// Exclusive upper bound for random cell values
    #[serde(default = "default_max_value")]
    pub max_value: i32,
    /// Fill every cell with this value instead of random data
    pub fill_value: Option<i32>,
    /// RNG seed for reproducible grids
    pub seed: Option<u64>,
}

fn default_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_max_value() -> i32 {
    DEFAULT_MAX_VALUE
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            max_value: default_max_value(),
            fill_value: None,
            seed: None,
        }
    }
}

/// Worker-pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Row distribution strategy
    #[serde(default)]
    pub strategy: Strategy,
    /// Reduce placement
    #[serde(default)]
    pub reduce: ReduceMode,
}

fn default_workers() -> usize {
    num_cpus::get().min(MAX_WORKERS)
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            strategy: Strategy::default(),
            reduce: ReduceMode::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report file path
    pub json_output: Option<PathBuf>,
    /// Include the per-worker breakdown in reports
    #[serde(default)]
    pub per_worker: bool,
    /// Dump the grid before reducing (small grids only)
    #[serde(default)]
    pub print_matrix: bool,
}

/// Runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Re-run the reduction single-threaded and compare
    #[serde(default)]
    pub verify: bool,
    /// Validate and print the configuration without running
    #[serde(default)]
    pub dry_run: bool,
    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

/// Configuration rejections, surfaced before any thread is spawned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be between 1 and {max}, got {size}")]
    SizeOutOfBounds { size: usize, max: usize },
    #[error("workers must be between 1 and {max}, got {workers}")]
    WorkersOutOfBounds { workers: usize, max: usize },
    #[error("max value must be positive, got {0}")]
    NonPositiveMaxValue(i32),
    #[error("barrier reduce requires the static strategy")]
    BarrierNeedsStatic,
    #[error("matrix printing is limited to {max}x{max} grids, got {size}x{size}")]
    GridTooLargeToPrint { size: usize, max: usize },
}

// Display trait implementations

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Grid: {}", self.grid)?;
        writeln!(f, "  Run: {}", self.run)?;
        writeln!(f, "  Output: {}", self.output)?;
        writeln!(f, "  Runtime: {}", self.runtime)?;
        Ok(())
    }
}

impl fmt::Display for GridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.size, self.size)?;
        match self.fill_value {
            Some(value) => write!(f, ", fill={}", value)?,
            None => write!(f, ", random values in [0, {})", self.max_value)?,
        }
        if let Some(seed) = self.seed {
            write!(f, ", seed={}", seed)?;
        }
        Ok(())
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} worker(s), {} striping, {} reduce",
            self.workers, self.strategy, self.reduce
        )
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref path) = self.json_output {
            parts.push(format!("json={}", path.display()));
        }
        if self.per_worker {
            parts.push("per_worker".to_string());
        }
        if self.print_matrix {
            parts.push("print_matrix".to_string());
        }
        if parts.is_empty() {
            write!(f, "text output")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.verify {
            parts.push("verify");
        }
        if self.dry_run {
            parts.push("dry_run");
        }
        if self.debug {
            parts.push("debug");
        }
        if parts.is_empty() {
            write!(f, "default")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
