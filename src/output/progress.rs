//! Shared progress counters and the live status line
//!
//! Every crawl unit holds a handle to one [`ProgressCounters`] aggregator
//! and bumps it with lock-free atomic increments. A background task
//! periodically snapshots the counters and redraws a single status line in
//! place; snapshots are eventually consistent, which is all a progress
//! display needs.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Monotonic counters shared by all crawl units
#[derive(Debug, Default)]
pub struct ProgressCounters {
    packages_scraped: AtomicU64,
    distributions_found: AtomicU64,
    total_size_bytes: AtomicU64,
}

/// A point-in-time reading of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub packages_scraped: u64,
    pub distributions_found: u64,
    pub total_size_bytes: u64,
}

impl ProgressCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one package as fully scraped
    pub fn record_package(&self) {
        self.packages_scraped.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one discovered distribution
    pub fn record_distribution(&self) {
        self.distributions_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds a probed size to the running total
    ///
    /// Negative sizes mean the length was unknown; they are skipped so the
    /// total stays monotonic.
    pub fn record_size(&self, size_bytes: i64) {
        if size_bytes > 0 {
            self.total_size_bytes
                .fetch_add(size_bytes as u64, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            packages_scraped: self.packages_scraped.load(Ordering::Relaxed),
            distributions_found: self.distributions_found.load(Ordering::Relaxed),
            total_size_bytes: self.total_size_bytes.load(Ordering::Relaxed),
        }
    }
}

/// Renders the one-line crawl status
///
/// Gigabytes are integer division by 1,000,000,000, truncated toward zero.
pub fn format_status_line(snapshot: &ProgressSnapshot, packages_total: usize) -> String {
    format!(
        "Scraped {}/{} packages, Distributions found: {}, Total size: {} GB",
        snapshot.packages_scraped,
        packages_total,
        snapshot.distributions_found,
        snapshot.total_size_bytes / 1_000_000_000
    )
}

/// Spawns the status-line task.
/// Returns (handle, stop) so the caller can signal stop and await the handle.
pub fn spawn_progress_reporter(
    counters: Arc<ProgressCounters>,
    packages_total: usize,
    interval: Duration,
) -> (JoinHandle<()>, Arc<AtomicBool>) {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let handle = tokio::spawn(async move {
        let line = ProgressBar::new_spinner();
        line.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        line.enable_steady_tick(Duration::from_millis(100));

        while !flag.load(Ordering::SeqCst) {
            line.set_message(format_status_line(&counters.snapshot(), packages_total));
            tokio::time::sleep(interval).await;
        }

        line.finish_and_clear();
    });

    (handle, stop)
}
