//! Configuration validation
//!
//! Every rejection happens here, before the coordinator spawns a single
//! thread. Out-of-range values are errors, never silently clamped.

use super::{Config, ConfigError, MAX_GRID_SIZE, MAX_PRINTABLE_SIZE, MAX_WORKERS};
use crate::coordinator::ReduceMode;
use crate::dispatch::Strategy;

/// Validate a complete run configuration.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_grid(config)?;
    validate_run(config)?;
    validate_output(config)?;
    Ok(())
}

fn validate_grid(config: &Config) -> Result<(), ConfigError> {
    let size = config.grid.size;
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(ConfigError::SizeOutOfBounds {
            size,
            max: MAX_GRID_SIZE,
        });
    }
    // bound only matters for random fill
    if config.grid.fill_value.is_none() && config.grid.max_value <= 0 {
        return Err(ConfigError::NonPositiveMaxValue(config.grid.max_value));
    }
    Ok(())
}

fn validate_run(config: &Config) -> Result<(), ConfigError> {
    let workers = config.run.workers;
    if workers == 0 || workers > MAX_WORKERS {
        return Err(ConfigError::WorkersOutOfBounds {
            workers,
            max: MAX_WORKERS,
        });
    }
    if config.run.reduce == ReduceMode::Barrier && config.run.strategy != Strategy::Static {
        return Err(ConfigError::BarrierNeedsStatic);
    }
    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.output.print_matrix && config.grid.size > MAX_PRINTABLE_SIZE {
        return Err(ConfigError::GridTooLargeToPrint {
            size: config.grid.size,
            max: MAX_PRINTABLE_SIZE,
        });
    }
    Ok(())
}
