//! Duplicate content detection across a page set
//!
//! Each page is reduced to its visible text (excluded region pruned, absolute
//! URLs stripped) and fingerprinted with SHA-256. Pages with equal
//! fingerprints are reported pairwise in input order.

use crate::config::AuditConfig;
use crate::digest::content_digest;
use crate::dom::Document;
use crate::fetch::{FetchOutcome, ResilientFetcher};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("valid regex"));

/// Two pages whose visible text is identical
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub first: String,
    pub second: String,
}

impl DuplicatePair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Returns true if `url` is either side of the pair
    pub fn involves(&self, url: &str) -> bool {
        self.first == url || self.second == url
    }
}

/// Duplicate pairs found across the pages audited together in site mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiblingSet {
    pub collisions: Vec<DuplicatePair>,
}

impl SiblingSet {
    pub fn new(collisions: Vec<DuplicatePair>) -> Self {
        Self { collisions }
    }

    pub fn collisions(&self) -> &[DuplicatePair] {
        &self.collisions
    }
}

/// Removes every absolute http(s) URL from `text`
pub fn strip_urls(text: &str) -> String {
    ABSOLUTE_URL.replace_all(text, "").into_owned()
}

/// Fingerprint of a page's visible text
pub fn content_fingerprint(html: &str, excluded_region: Option<&str>) -> String {
    let document = Document::parse_pruned(html, excluded_region);
    content_digest(strip_urls(&document.visible_text()).as_bytes())
}

/// Pairs of equal fingerprints, `(i, j)` with `i < j` in input order
pub fn find_collisions(fingerprints: &[(String, String)]) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();
    for (i, (first_url, first_digest)) in fingerprints.iter().enumerate() {
        for (second_url, second_digest) in &fingerprints[i + 1..] {
            if first_digest == second_digest {
                pairs.push(DuplicatePair::new(first_url.clone(), second_url.clone()));
            }
        }
    }
    pairs
}

/// Fetches a page set and reports duplicate pairs
pub struct DuplicateDetector<'a> {
    fetcher: &'a ResilientFetcher,
    excluded_region: Option<&'a str>,
}

impl<'a> DuplicateDetector<'a> {
    pub fn new(fetcher: &'a ResilientFetcher, config: &'a AuditConfig) -> Self {
        Self {
            fetcher,
            excluded_region: config.excluded_region(),
        }
    }

    /// Fetches each URL once and pairs pages with identical content
    ///
    /// Pages that cannot be fetched, or answer with a non-2xx status, are
    /// left out of the comparison.
    pub async fn detect(&self, urls: &[String]) -> Vec<DuplicatePair> {
        let mut fingerprints = Vec::with_capacity(urls.len());

        for url in urls {
            match self.fetcher.get(url).await {
                Ok(FetchOutcome::Fetched(response)) if response.is_success() => {
                    let digest = content_fingerprint(&response.text(), self.excluded_region);
                    debug!("Fingerprint for {}: {}", url, digest);
                    fingerprints.push((url.clone(), digest));
                }
                Ok(FetchOutcome::Fetched(response)) => {
                    warn!(
                        "Skipping {} in duplicate check: HTTP {}",
                        url, response.status
                    );
                }
                Ok(FetchOutcome::Unreachable { reason, .. }) => {
                    warn!("Skipping {} in duplicate check: {}", url, reason);
                }
                Err(e) => warn!("Skipping {} in duplicate check: {}", url, e),
            }
        }

        find_collisions(&fingerprints)
    }
}
