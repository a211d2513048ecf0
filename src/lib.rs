//! gridsum - Multi-threaded grid reduction benchmark
//!
//! gridsum computes aggregate statistics (sum, minimum, maximum with their
//! positions) over a dense 2-D integer grid using a pool of cooperating
//! worker threads, and reports the elapsed wall-clock time.
//!
//! # Architecture
//!
//! - **Two distribution strategies**: static striping (pre-assigned row
//!   ranges) and dynamic dispatch (rows pulled from a shared cursor)
//! - **Two reduce placements**: a designated worker behind a reusable
//!   barrier, or the coordinator after joining all workers
//! - **Deterministic results**: first-encountered-wins tie-break for
//!   extrema, identical across worker counts and strategies
//! - **Plain-data reports**: text banner or JSON export

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod grid;
pub mod output;
pub mod stats;
pub mod sync;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{Coordinator, ReductionReport};
pub use grid::Grid;

/// Result type used throughout gridsum
pub type Result<T> = anyhow::Result<T>;
