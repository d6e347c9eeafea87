use serde::Deserialize;

/// Main configuration structure for Registry Sounder
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub registry: RegistryConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Registry endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// URL of the registry's flat package index
    #[serde(rename = "index-url")]
    pub index_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of HTTP requests simultaneously in flight
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Pause between successive package task launches (microseconds)
    #[serde(rename = "launch-delay-micros", default = "default_launch_delay")]
    pub launch_delay_micros: u64,

    /// Abort the whole run on the first package-level failure
    #[serde(rename = "fail-fast", default)]
    pub fail_fast: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV results file
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

/// Progress reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Refresh interval of the status line (milliseconds)
    #[serde(rename = "interval-millis", default = "default_report_interval")]
    pub interval_millis: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_millis: default_report_interval(),
        }
    }
}

fn default_launch_delay() -> u64 {
    1
}

fn default_report_interval() -> u64 {
    1000
}
