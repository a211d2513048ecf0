//! gridsum CLI entry point

use anyhow::{Context, Result};
use gridsum::config::{cli::Cli, toml as config_toml, validator, Config};
use gridsum::coordinator::Coordinator;
use gridsum::grid::Grid;
use gridsum::output::{json, text};
use gridsum::worker::sequential_scan;
use std::time::Instant;

fn main() -> Result<()> {
    println!("gridsum v{}", env!("CARGO_PKG_VERSION"));
    println!("Multi-threaded grid reduction benchmark");
    println!();

    let cli = Cli::parse_args();

    // Build configuration from config file (if any) and CLI overrides
    let config = build_config(&cli)?;

    // Validate configuration before any thread is spawned
    validator::validate_config(&config).context("Configuration validation failed")?;

    println!("{}", config);

    if config.runtime.dry_run {
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    // Materialize the grid
    let build_start = Instant::now();
    let grid = build_grid(&config);
    if config.runtime.debug {
        eprintln!(
            "DEBUG TIMING: Grid build: {:.3}s",
            build_start.elapsed().as_secs_f64()
        );
    }

    if config.output.print_matrix {
        text::print_matrix(&grid);
    }

    println!("Starting reduction...");
    println!();

    let coordinator = Coordinator::new(config.clone(), grid);
    let report = coordinator.run()?;

    if config.runtime.verify {
        verify_report(&coordinator, &report)?;
        println!("Verification: parallel result matches sequential reference");
        println!();
    }

    text::print_report(&report, &config);

    if let Some(ref path) = config.output.json_output {
        json::write_json_report(path, &report, &config)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

/// Build configuration from CLI arguments and optional TOML file
fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => config_toml::parse_toml_file(path)?,
        None => Config::default(),
    };

    Ok(config_toml::merge_cli_with_config(cli, base))
}

/// Materialize the grid described by the configuration
fn build_grid(config: &Config) -> Grid {
    match config.grid.fill_value {
        Some(value) => Grid::filled(config.grid.size, value),
        None => Grid::random(config.grid.size, config.grid.max_value, config.grid.seed),
    }
}

/// Compare the parallel result against the single-threaded reference.
///
/// Positions are excluded from the comparison: with duplicated extremum
/// values the dynamic strategy may legitimately report a different (equally
/// valid) position than the sequential scan.
fn verify_report(
    coordinator: &Coordinator,
    report: &gridsum::coordinator::ReductionReport,
) -> Result<()> {
    let reference = sequential_scan(coordinator.grid());

    if report.result.sum != reference.sum {
        anyhow::bail!(
            "verification failed: sum {} != sequential {}",
            report.result.sum,
            reference.sum
        );
    }
    let value_of = |e: Option<gridsum::stats::Extremum>| e.map(|e| e.value);
    if value_of(report.result.min) != value_of(reference.min) {
        anyhow::bail!(
            "verification failed: min {} != sequential {}",
            text::format_extremum(report.result.min),
            text::format_extremum(reference.min)
        );
    }
    if value_of(report.result.max) != value_of(reference.max) {
        anyhow::bail!(
            "verification failed: max {} != sequential {}",
            text::format_extremum(report.result.max),
            text::format_extremum(reference.max)
        );
    }

    Ok(())
}
