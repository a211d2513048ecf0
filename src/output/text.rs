//! Text output formatting

use crate::config::Config;
use crate::coordinator::ReductionReport;
use crate::grid::Grid;
use crate::stats::Extremum;
use crate::util::time::{calculate_rate, format_rate};

/// Print the result banner for a completed pass.
pub fn print_report(report: &ReductionReport, config: &Config) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                  REDUCTION RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Elapsed Time: {:.3}s", report.elapsed.as_secs_f64());
    println!();

    println!("Grid:");
    println!(
        "  Size:  {} x {} ({} cells)",
        config.grid.size,
        config.grid.size,
        format_number(report.result.cells)
    );
    println!(
        "  Workers: {} ({} striping, {} reduce)",
        report.workers, report.strategy, report.reduce_mode
    );
    println!();

    println!("Result:");
    println!("  Sum: {}", format_number_i64(report.result.sum));
    println!("  Min: {}", format_extremum(report.result.min));
    println!("  Max: {}", format_extremum(report.result.max));
    println!();

    let rate = calculate_rate(report.result.cells, report.elapsed);
    println!("Throughput:");
    println!("  {} cells/s", format_rate(rate));
    println!();

    if config.output.per_worker {
        print_per_worker(report);
    }

    println!("═══════════════════════════════════════════════════════════");
}

/// Per-worker breakdown table.
fn print_per_worker(report: &ReductionReport) {
    println!("Per-worker:");
    for (id, partial) in report.per_worker.iter().enumerate() {
        if partial.is_empty() {
            println!("  [{}] idle (no rows assigned)", id);
        } else {
            println!(
                "  [{}] rows={} sum={} min={} max={}",
                id,
                partial.rows,
                format_number_i64(partial.sum),
                format_extremum(partial.min),
                format_extremum(partial.max),
            );
        }
    }
    println!();
}

/// Render an extremum as `value at (row, col)`.
///
/// An absent extremum (empty scan) renders with the (-1, -1) sentinel
/// position.
pub fn format_extremum(extremum: Option<Extremum>) -> String {
    match extremum {
        Some(e) => format!("{} at ({}, {})", e.value, e.row, e.col),
        None => "none at (-1, -1)".to_string(),
    }
}

/// Dump the grid contents (guarded to small sizes by validation).
pub fn print_matrix(grid: &Grid) {
    println!("matrix:");
    for row in 0..grid.size() {
        for &value in grid.row(row) {
            print!("{:5} ", value);
        }
        println!();
    }
    println!();
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for c in s.chars().rev() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Format a signed number with thousands separators
pub fn format_number_i64(n: i64) -> String {
    if n < 0 {
        format!("-{}", format_number(n.unsigned_abs()))
    } else {
        format_number(n as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_number_i64() {
        assert_eq!(format_number_i64(-1234), "-1,234");
        assert_eq!(format_number_i64(42), "42");
    }

    #[test]
    fn test_format_extremum() {
        let e = Extremum {
            value: 7,
            row: 2,
            col: 3,
        };
        assert_eq!(format_extremum(Some(e)), "7 at (2, 3)");
        assert_eq!(format_extremum(None), "none at (-1, -1)");
    }
}
