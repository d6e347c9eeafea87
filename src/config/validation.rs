use crate::config::types::{Config, CrawlerConfig, OutputConfig, RegistryConfig, ReportConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_registry_config(&config.registry)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_report_config(&config.report)?;
    Ok(())
}

/// Validates registry configuration
fn validate_registry_config(config: &RegistryConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.index_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "index-url must use an http or https scheme, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 10_000 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 10000, got {}",
            config.max_concurrent_requests
        )));
    }

    // launch_delay_micros of 0 is allowed: launches are then back-to-back

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates report configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.interval_millis < 100 {
        return Err(ConfigError::Validation(format!(
            "interval_millis must be >= 100ms, got {}ms",
            config.interval_millis
        )));
    }

    Ok(())
}
