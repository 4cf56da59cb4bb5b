//! Configuration module for Site-Audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a config file is the common case.
//!
//! # Example
//!
//! ```no_run
//! use site_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("audit.toml")).unwrap();
//! println!("Excluded region: {:?}", config.audit.excluded_region());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AuditConfig, Config, FetchConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
