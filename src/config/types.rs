use crate::fetch::RetryPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Audit
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Network retry and timeout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total attempts per request, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt (milliseconds)
    #[serde(rename = "initial-backoff-ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound for any single backoff delay (milliseconds)
    #[serde(rename = "max-backoff-ms")]
    pub max_backoff_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 4_000,
            max_backoff_ms: 10_000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FetchConfig {
    /// Builds the retry policy described by this section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    pub name: String,

    /// Version sent in the User-Agent header
    pub version: String,

    /// Optional URL describing the auditor
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "site-audit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Rule thresholds and page-selection limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Id of the page region (shared chrome) removed before any rule runs.
    /// An empty string disables pruning.
    #[serde(rename = "excluded-region-id")]
    pub excluded_region_id: String,

    /// Maximum number of pages analyzed in site mode
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Load time above which a page is reported as slow (seconds)
    #[serde(rename = "slow-page-secs")]
    pub slow_page_secs: f64,

    /// URLs longer than this are reported
    #[serde(rename = "max-url-length")]
    pub max_url_length: usize,

    /// Contrast scores above this are recorded as good contrast
    #[serde(rename = "contrast-threshold")]
    pub contrast_threshold: f64,

    /// Effective font sizes below this are reported (pixels)
    #[serde(rename = "min-font-size-px")]
    pub min_font_size_px: f64,

    /// Image URLs containing any of these are exempt from the WebP check
    #[serde(rename = "image-exempt-keywords")]
    pub image_exempt_keywords: Vec<String>,

    /// Link extensions excluded from the same-domain page set
    #[serde(rename = "asset-extensions")]
    pub asset_extensions: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            excluded_region_id: "footer-page".to_string(),
            max_pages: 50,
            slow_page_secs: 3.0,
            max_url_length: 100,
            contrast_threshold: 2.0,
            min_font_size_px: 16.0,
            image_exempt_keywords: vec!["logo".to_string(), "plugin".to_string()],
            asset_extensions: ["webp", "jpg", "jpeg", "png"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AuditConfig {
    /// Returns the excluded region id, or None when pruning is disabled
    pub fn excluded_region(&self) -> Option<&str> {
        Some(self.excluded_region_id.trim()).filter(|id| !id.is_empty())
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the combined HTML report
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Also write one `report_<digest>.html` per analyzed page
    #[serde(rename = "keep-page-reports")]
    pub keep_page_reports: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "combined_accessibility_seo_report.html".to_string(),
            keep_page_reports: false,
        }
    }
}
