use crate::config::types::{
    CacheConfig, ChannelConfig, Config, FetcherConfig, OutputConfig, SourceConfig,
    TranscodeConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_transcode_config(&config.transcode)?;
    validate_cache_config(&config.cache)?;
    validate_channel_config(&config.channel)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "origin must use HTTP(S), got '{}'",
            config.origin
        )));
    }

    if config.language_code.trim().is_empty() {
        return Err(ConfigError::Validation(
            "language_code cannot be empty".to_string(),
        ));
    }

    for (name, path) in [
        ("document_listing", &config.document_listing),
        ("video_listing", &config.video_listing),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{} must start with '/', got '{}'",
                name, path
            )));
        }
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.download_timeout_secs < config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "download_timeout_secs ({}) must be >= timeout_secs ({})",
            config.download_timeout_secs, config.timeout_secs
        )));
    }

    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.max_concurrent_downloads < 1 || config.max_concurrent_downloads > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_downloads must be between 1 and 64, got {}",
            config.max_concurrent_downloads
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_transcode_config(config: &TranscodeConfig) -> Result<(), ConfigError> {
    if config.size_limit_bytes == 0 {
        return Err(ConfigError::Validation(
            "size_limit_bytes must be > 0".to_string(),
        ));
    }

    if config.compressor.trim().is_empty() {
        return Err(ConfigError::Validation(
            "compressor cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.raw_dir.is_empty() || config.compressed_dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache directories cannot be empty".to_string(),
        ));
    }

    // Both namespaces use the same file names
    if config.raw_dir == config.compressed_dir {
        return Err(ConfigError::Validation(format!(
            "raw_dir and compressed_dir must differ, both are '{}'",
            config.raw_dir
        )));
    }

    Ok(())
}

/// Validates channel metadata
fn validate_channel_config(config: &ChannelConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("title", &config.title),
        ("source_id", &config.source_id),
        ("language", &config.language),
        ("author", &config.author),
        ("license", &config.license),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "channel {} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.manifest_path.is_empty() {
        return Err(ConfigError::Validation(
            "manifest_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
