//! Registry Sounder: a package registry size sounder
//!
//! This crate implements a crawler that walks a package registry's flat HTML
//! index, discovers every package and every downloadable distribution file,
//! probes each file's byte size, and streams the results to a CSV file while
//! keeping a live progress line.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Registry Sounder operations
#[derive(Debug, Error)]
pub enum SounderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed URL '{url}': {source}")]
    MalformedUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Request failed for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Failed to resolve href '{href}' against {base}: {source}")]
    UrlResolution {
        href: String,
        base: String,
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Registry Sounder operations
pub type Result<T> = std::result::Result<T, SounderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlOutcome, CrawlReport, Package, RequestGate};
pub use output::{CsvSink, ProgressCounters};
