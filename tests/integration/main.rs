//! Integration tests for the auditor
//!
//! These tests use wiremock to create mock HTTP servers and run the fetcher,
//! the page analyzer and whole audit sessions end-to-end.

mod audit_tests;
mod fetch_tests;

use site_audit::config::Config;
use site_audit::ResilientFetcher;

/// Default configuration with millisecond backoffs
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.fetch.initial_backoff_ms = 1;
    config.fetch.max_backoff_ms = 5;
    config.fetch.request_timeout_secs = 5;
    config.fetch.connect_timeout_secs = 2;
    config
}

pub fn fetcher(config: &Config) -> ResilientFetcher {
    ResilientFetcher::from_config(config).expect("Failed to build HTTP client")
}
