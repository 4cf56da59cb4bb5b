use crate::config::types::{AuditConfig, Config, FetchConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_audit_config(&config.audit)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates retry and timeout settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.initial_backoff_ms > config.max_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "initial-backoff-ms ({}) cannot exceed max-backoff-ms ({})",
            config.initial_backoff_ms, config.max_backoff_ms
        )));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request and connect timeouts must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, '-' and '_', got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates rule thresholds
fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    for (name, value) in [
        ("slow-page-secs", config.slow_page_secs),
        ("contrast-threshold", config.contrast_threshold),
        ("min-font-size-px", config.min_font_size_px),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
    }

    if config.max_url_length == 0 {
        return Err(ConfigError::Validation(
            "max-url-length must be >= 1".to_string(),
        ));
    }

    if config.asset_extensions.iter().any(|ext| ext.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "asset-extensions cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
