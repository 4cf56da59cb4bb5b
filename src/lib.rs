//! Site-Audit: accessibility and SEO auditing for small websites
//!
//! This crate fetches one page (or the same-domain pages linked from it),
//! evaluates each page against a fixed catalogue of structural, content and
//! accessibility rules, and assembles a combined, severity-sorted HTML report.

pub mod audit;
pub mod config;
pub mod digest;
pub mod dom;
pub mod fetch;
pub mod output;
pub mod rules;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Seed page {url} is unavailable: {reason}")]
    SeedUnavailable { url: String, reason: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: audit::PageState,
        to: audit::PageState,
    },

    #[error("No page completed successfully; nothing to report")]
    NothingToReport,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{AuditSession, PageAnalyzer, PageAuditResult, PageOutcome, PageState, Scope};
pub use config::Config;
pub use fetch::{FetchOutcome, FetchResult, ResilientFetcher};
pub use rules::{Category, Finding, FindingSet, Severity};
