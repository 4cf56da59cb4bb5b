use crate::config::types::Config;
use crate::config::validation::validate;
use crate::digest::content_digest;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_audit::config::load_config;
///
/// let config = load_config(Path::new("audit.toml")).unwrap();
/// println!("Max pages: {}", config.audit.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two reports can be tied to the same settings.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    Ok(content_digest(&content))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
