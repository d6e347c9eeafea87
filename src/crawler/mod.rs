//! Crawler module for registry walking and size probing
//!
//! This module contains the core crawling logic, including:
//! - Anchor extraction from registry HTML
//! - Concurrency-governed HTTP fetching
//! - Package and distribution discovery
//! - Overall crawl coordination

mod anchors;
mod coordinator;
mod discovery;
mod fetcher;

pub use anchors::{extract_anchors, AnchorTag};
pub use coordinator::{Coordinator, CrawlOutcome, CrawlReport, PackageFailure};
pub use discovery::{discover_distributions, discover_packages, probe_size, Distribution, Package};
pub use fetcher::{build_http_client, RequestGate};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the output sink and write the header
/// 2. Discover every package on the registry index
/// 3. Probe every distribution's size through the request gate
/// 4. Return a report of what was found
pub async fn crawl(config: Config) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
