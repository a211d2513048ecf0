//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Row distribution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Pre-assigned contiguous row ranges
    Static,
    /// Rows pulled from a shared cursor
    Dynamic,
}

impl From<StrategyArg> for crate::dispatch::Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Static => Self::Static,
            StrategyArg::Dynamic => Self::Dynamic,
        }
    }
}

/// Reduce placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReduceArg {
    /// Worker 0 reduces after a barrier (static strategy only)
    Barrier,
    /// The coordinator reduces after joining all workers
    Join,
}

impl From<ReduceArg> for crate::coordinator::ReduceMode {
    fn from(arg: ReduceArg) -> Self {
        match arg {
            ReduceArg::Barrier => Self::Barrier,
            ReduceArg::Join => Self::Join,
        }
    }
}

/// gridsum - Multi-threaded grid reduction benchmark
#[derive(Parser, Debug)]
#[command(name = "gridsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI flags override file values)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // === Grid Options ===
    /// Grid dimension (rows == cols)
    #[arg(short = 's', long)]
    pub size: Option<usize>,

    /// Exclusive upper bound for random cell values
    #[arg(long)]
    pub max_value: Option<i32>,

    /// Fill every cell with this value instead of random data
    #[arg(long)]
    pub fill_value: Option<i32>,

    /// RNG seed for a reproducible grid
    #[arg(long)]
    pub seed: Option<u64>,

    // === Worker Options ===
    /// Number of worker threads (default: available CPUs)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Row distribution strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Where the cross-worker reduce runs
    #[arg(long, value_enum)]
    pub reduce: Option<ReduceArg>,

    // === Output Options ===
    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Show the per-worker breakdown
    #[arg(long)]
    pub per_worker: bool,

    /// Dump the grid before reducing (small grids only)
    #[arg(long)]
    pub print_matrix: bool,

    // === Runtime Options ===
    /// Re-run the reduction single-threaded and compare results
    #[arg(long)]
    pub verify: bool,

    /// Validate and print the configuration without running
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse arguments from the process command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
