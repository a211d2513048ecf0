//! TOML configuration file parsing

use super::Config;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    // Grid settings
    if let Some(size) = cli.size {
        config.grid.size = size;
    }
    if let Some(max_value) = cli.max_value {
        config.grid.max_value = max_value;
    }
    if let Some(fill_value) = cli.fill_value {
        config.grid.fill_value = Some(fill_value);
    }
    if let Some(seed) = cli.seed {
        config.grid.seed = Some(seed);
    }

    // Worker settings
    if let Some(workers) = cli.workers {
        config.run.workers = workers;
    }
    if let Some(strategy) = cli.strategy {
        config.run.strategy = strategy.into();
    }
    if let Some(reduce) = cli.reduce {
        config.run.reduce = reduce.into();
    }

    // Output settings
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.per_worker {
        config.output.per_worker = true;
    }
    if cli.print_matrix {
        config.output.print_matrix = true;
    }

    // Runtime settings
    if cli.verify {
        config.runtime.verify = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    config
}
