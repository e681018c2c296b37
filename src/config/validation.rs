use crate::config::types::{Config, CrawlerConfig, FetcherConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed-url '{}': {}", config.seed_url, e))
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "seed-url must use the http or https scheme, got '{}'",
            seed.scheme()
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url '{}' has no host",
            config.seed_url
        )));
    }

    if config.visited_log.is_empty() {
        return Err(ConfigError::Validation(
            "visited-log cannot be empty".to_string(),
        ));
    }

    for pattern in &config.exclude_patterns {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Exclusion patterns cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.page_load_timeout < 1 || config.page_load_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "page-load-timeout must be between 1 and 300 seconds, got {}",
            config.page_load_timeout
        )));
    }

    if config.request_timeout < 1 || config.request_timeout > 600 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be between 1 and 600 seconds, got {}",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 || config.connect_timeout > 60 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout must be between 1 and 60 seconds, got {}",
            config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.bucket.is_empty() {
        return Err(ConfigError::Validation(
            "bucket cannot be empty".to_string(),
        ));
    }

    validate_object_key("text-prefix", &config.text_prefix)?;
    validate_object_key("binary-prefix", &config.binary_prefix)?;
    validate_object_key("metadata-key", &config.metadata_key)?;
    validate_object_key("failures-key", &config.failures_key)?;

    if config.text_prefix == config.binary_prefix {
        return Err(ConfigError::Validation(format!(
            "text-prefix and binary-prefix must differ, both are '{}'",
            config.text_prefix
        )));
    }

    if config.metadata_key == config.failures_key {
        return Err(ConfigError::Validation(format!(
            "metadata-key and failures-key must differ, both are '{}'",
            config.metadata_key
        )));
    }

    Ok(())
}

/// Validates a configured object key or key prefix
///
/// Keys are relative paths inside the bucket. Absolute keys and parent
/// directory segments would escape it.
fn validate_object_key(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            name
        )));
    }

    if value.starts_with('/') || value.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} cannot start or end with '/', got '{}'",
            name, value
        )));
    }

    if value.split('/').any(|segment| segment == "..") {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain '..' segments, got '{}'",
            name, value
        )));
    }

    Ok(())
}
