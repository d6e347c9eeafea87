//! Registry Sounder main entry point
//!
//! This is the command-line interface for the Registry Sounder crawler.

use anyhow::Context;
use clap::Parser;
use registry_sounder::config::load_config_with_hash;
use registry_sounder::crawler::crawl;
use registry_sounder::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Registry Sounder: a package registry size sounder
///
/// Registry Sounder walks a package registry's flat HTML index, probes the
/// byte size of every downloadable distribution it finds, and streams the
/// results to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "registry-sounder")]
#[command(version = "1.0.0")]
#[command(about = "A package registry size sounder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("registry_sounder=info,warn"),
            1 => EnvFilter::new("registry_sounder=debug,info"),
            2 => EnvFilter::new("registry_sounder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &registry_sounder::config::Config) {
    println!("=== Registry Sounder Dry Run ===\n");

    println!("Registry:");
    println!("  Index URL: {}", config.registry.index_url);

    println!("\nCrawler:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Launch delay: {}us", config.crawler.launch_delay_micros);
    println!(
        "  Failure policy: {}",
        if config.crawler.fail_fast {
            "fail-fast"
        } else {
            "continue"
        }
    );

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\nReport:");
    println!("  Status interval: {}ms", config.report.interval_millis);

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl the index at {}", config.registry.index_url);
}

/// Handles the main crawl operation
async fn handle_crawl(config: registry_sounder::config::Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of {}", config.registry.index_url);

    match crawl(config).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
