//! Output module for the result sink, progress reporting, and the final report
//!
//! This module handles:
//! - The append-only CSV sink receiving one row per distribution
//! - Shared progress counters and the live status line
//! - Printing the end-of-run crawl report

mod csv_sink;
pub mod progress;

pub use csv_sink::CsvSink;
pub use progress::{
    format_status_line, spawn_progress_reporter, ProgressCounters, ProgressSnapshot,
};

use crate::crawler::{CrawlOutcome, CrawlReport};

/// Prints the end-of-run report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Packages:");
    println!("  Discovered: {}", report.packages_total);
    println!("  Scraped: {}", report.packages_scraped);
    println!("  Failed: {}", report.failures.len());
    println!();

    println!("Distributions:");
    println!("  Found: {}", report.distributions_found);
    println!(
        "  Total size: {} GB ({} bytes)",
        report.total_size_bytes / 1_000_000_000,
        report.total_size_bytes
    );
    println!();

    if !report.failures.is_empty() {
        println!("Package Failures ({}):", report.failures.len());
        for failure in report.failures.iter().take(10) {
            println!("  - {}: {}", failure.package, failure.error);
        }
        if report.failures.len() > 10 {
            println!("  ... and {} more", report.failures.len() - 10);
        }
        println!();
    }

    println!("Requests issued: {}", report.requests_issued);
    println!("Elapsed: {:.1?}", report.elapsed);

    match report.outcome {
        CrawlOutcome::Complete => println!("\n✓ Crawl completed fully"),
        CrawlOutcome::CompletedWithFailures(count) => {
            println!("\n✓ Crawl completed with {} package-level failures", count)
        }
    }
}
