use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    let host = url.host_str().ok_or_else(|| {
        ConfigError::InvalidUrl(format!("base_url '{}' has no host", config.base_url))
    })?;

    if let Some(domain) = &config.base_domain {
        if domain.trim().is_empty() {
            return Err(ConfigError::Validation(
                "base_domain cannot be empty".to_string(),
            ));
        }

        if !host.to_lowercase().contains(&domain.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "base_domain '{}' does not match base_url host '{}'",
                domain, host
            )));
        }
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates discovery behavior configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.min_content_length < 1 {
        return Err(ConfigError::Validation(
            "min_content_length must be >= 1".to_string(),
        ));
    }

    if config.max_pagination_clicks < 1 || config.max_pagination_clicks > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_pagination_clicks must be between 1 and 1000, got {}",
            config.max_pagination_clicks
        )));
    }

    if config.max_queue_size == Some(0) {
        return Err(ConfigError::Validation(
            "max_queue_size must be >= 1 when set".to_string(),
        ));
    }

    if config.max_runtime_secs == Some(0) {
        return Err(ConfigError::Validation(
            "max_runtime_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.mapsite_path.is_empty() {
        return Err(ConfigError::Validation(
            "mapsite_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
