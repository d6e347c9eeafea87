//! Crawl coordinator - main crawl orchestration logic
//!
//! This module drives the whole pipeline through its four phases:
//! discovering the package list, launching one crawl unit per package,
//! draining the units, and closing the sink. Each unit walks a single
//! package (distribution discovery, then one size probe and one sink append
//! per distribution) and is isolated from its siblings: how a unit failure
//! affects the run is a configuration choice, not a structural one.

use crate::config::Config;
use crate::crawler::discovery::{discover_distributions, discover_packages, probe_size, Package};
use crate::crawler::fetcher::{build_http_client, RequestGate};
use crate::output::{spawn_progress_reporter, CsvSink, ProgressCounters};
use crate::Result;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every package was scraped
    Complete,

    /// The run finished, but this many packages failed
    CompletedWithFailures(usize),
}

/// One package that could not be scraped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFailure {
    /// Name of the failed package
    pub package: String,

    /// Rendered error that sank it
    pub error: String,
}

/// Summary of a finished run, returned from [`Coordinator::run`]
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,

    /// Packages found on the registry index
    pub packages_total: usize,

    /// Packages whose unit ran to completion
    pub packages_scraped: u64,

    pub distributions_found: u64,
    pub total_size_bytes: u64,

    /// Per-package failures captured while draining
    pub failures: Vec<PackageFailure>,

    /// HTTP requests that went through the gate
    pub requests_issued: u64,

    pub elapsed: Duration,
}

/// Main crawl coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    gate: Arc<RequestGate>,
    counters: Arc<ProgressCounters>,
    sink: Arc<CsvSink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and gate, initializes the progress counters,
    /// and creates the CSV sink (truncating any previous output file and
    /// writing the header row).
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client()?;
        let gate = RequestGate::new(client, config.crawler.max_concurrent_requests as usize);
        let sink = CsvSink::create(Path::new(&config.output.csv_path))?;

        Ok(Self {
            config: Arc::new(config),
            gate: Arc::new(gate),
            counters: Arc::new(ProgressCounters::new()),
            sink: Arc::new(sink),
        })
    }

    /// Runs the crawl to completion
    ///
    /// Phases:
    /// 1. Discovering - fetch the package list once; failure here is fatal
    ///    regardless of the failure policy.
    /// 2. Crawling - launch one unit per package in index order, pausing the
    ///    configured launch delay between spawns. The pause only smooths the
    ///    startup burst; total concurrency is bounded by the gate alone.
    /// 3. Draining - harvest every unit. Unit errors are captured per
    ///    package, unless `fail-fast` is set, in which case the first error
    ///    aborts the run and in-flight units are dropped with the JoinSet.
    /// 4. Done - stop the reporter, flush the sink, return the report.
    pub async fn run(&self) -> Result<CrawlReport> {
        let started = Instant::now();

        // Discovering
        tracing::info!(
            "Discovering packages from {}",
            self.config.registry.index_url
        );
        let packages = discover_packages(&self.gate, &self.config.registry.index_url).await?;
        let packages_total = packages.len();
        tracing::info!("Discovered {} packages", packages_total);

        let (reporter, stop_reporter) = spawn_progress_reporter(
            Arc::clone(&self.counters),
            packages_total,
            Duration::from_millis(self.config.report.interval_millis),
        );

        // Crawling
        let launch_delay = Duration::from_micros(self.config.crawler.launch_delay_micros);
        let mut units: JoinSet<(String, Result<()>)> = JoinSet::new();

        for package in packages {
            let gate = Arc::clone(&self.gate);
            let sink = Arc::clone(&self.sink);
            let counters = Arc::clone(&self.counters);

            units.spawn(async move {
                let name = package.name.clone();
                let result = scrape_package(&gate, &sink, &counters, &package).await;
                (name, result)
            });

            if !launch_delay.is_zero() {
                tokio::time::sleep(launch_delay).await;
            }
        }

        // Draining
        let mut failures = Vec::new();
        while let Some(joined) = units.join_next().await {
            let (name, result) = match joined {
                Ok(unit_output) => unit_output,
                Err(join_error) => {
                    // A panicked unit is fatal no matter the failure policy
                    stop_reporter.store(true, Ordering::SeqCst);
                    let _ = reporter.await;
                    return Err(join_error.into());
                }
            };

            if let Err(error) = result {
                if self.config.crawler.fail_fast {
                    tracing::error!("Package {} failed, aborting run: {}", name, error);
                    stop_reporter.store(true, Ordering::SeqCst);
                    let _ = reporter.await;
                    return Err(error);
                }

                tracing::warn!("Package {} failed: {}", name, error);
                failures.push(PackageFailure {
                    package: name,
                    error: error.to_string(),
                });
            }
        }

        // Done
        stop_reporter.store(true, Ordering::SeqCst);
        let _ = reporter.await;
        self.sink.finish()?;

        let snapshot = self.counters.snapshot();
        let outcome = if failures.is_empty() {
            CrawlOutcome::Complete
        } else {
            CrawlOutcome::CompletedWithFailures(failures.len())
        };

        tracing::info!(
            "Crawl completed: {}/{} packages, {} distributions in {:?}",
            snapshot.packages_scraped,
            packages_total,
            snapshot.distributions_found,
            started.elapsed()
        );

        Ok(CrawlReport {
            outcome,
            packages_total,
            packages_scraped: snapshot.packages_scraped,
            distributions_found: snapshot.distributions_found,
            total_size_bytes: snapshot.total_size_bytes,
            failures,
            requests_issued: self.gate.issued(),
            elapsed: started.elapsed(),
        })
    }
}

/// One unit of work: scrapes a single package end to end
///
/// Discovers the package's distributions, then probes each one and appends
/// its row to the sink. The package only counts as scraped once every
/// distribution made it through.
async fn scrape_package(
    gate: &RequestGate,
    sink: &CsvSink,
    counters: &ProgressCounters,
    package: &Package,
) -> Result<()> {
    let distributions = discover_distributions(gate, package).await?;

    for distribution in distributions {
        counters.record_distribution();

        let size_bytes = probe_size(gate, &distribution.url).await?;
        counters.record_size(size_bytes);

        sink.append(&distribution.package.name, &distribution.name, size_bytes)?;
    }

    counters.record_package();
    Ok(())
}
