//! Audit session - seed URL and scope to a list of page outcomes
//!
//! In page scope only the seed is analyzed. In site scope the seed page is
//! fetched once to enumerate same-site, non-asset links (first appearance
//! order, capped at `max-pages`), duplicate content is computed across that
//! set, and every page is analyzed sequentially.

use super::analyzer::{PageAnalyzer, PageOutcome};
use super::duplicates::{DuplicateDetector, SiblingSet};
use crate::config::{AuditConfig, Config};
use crate::dom::Document;
use crate::fetch::{FetchOutcome, ResilientFetcher};
use crate::url::{is_asset_link, resolve_link, same_site};
use crate::AuditError;
use clap::ValueEnum;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};
use url::Url;

/// How much of the site to audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    /// Only the given URL
    #[value(alias = "1")]
    Page,
    /// The given URL and the same-site pages it links to
    #[value(alias = "2")]
    Site,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Site => write!(f, "site"),
        }
    }
}

/// Outcomes of one session, in analysis order
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub seed: Url,
    pub targets: Vec<Url>,
    pub outcomes: Vec<PageOutcome>,
}

impl SessionReport {
    pub fn completed(&self) -> impl Iterator<Item = &super::PageAuditResult> + '_ {
        self.outcomes.iter().filter_map(PageOutcome::as_completed)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_completed()).count()
    }
}

/// Same-site page links of the seed page
///
/// Links are kept in first-appearance order, asset extensions are skipped,
/// and the list is capped at `max_pages`. A page without such links yields
/// the seed alone.
pub fn discover_targets(html: &str, seed: &Url, config: &AuditConfig) -> Vec<Url> {
    let document = Document::parse(html);
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    let anchors = match document.select("a[href]") {
        Ok(anchors) => anchors,
        Err(e) => {
            warn!("Link discovery on {} failed: {}", seed, e);
            Vec::new()
        }
    };

    for anchor in anchors {
        if targets.len() >= config.max_pages {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = resolve_link(href, seed) else {
            continue;
        };
        if !same_site(&link, seed) || is_asset_link(&link, &config.asset_extensions) {
            continue;
        }
        if seen.insert(link.to_string()) {
            targets.push(link);
        }
    }

    if targets.is_empty() {
        targets.push(seed.clone());
    }
    targets
}

/// One run of the auditor over a seed URL
pub struct AuditSession<'a> {
    fetcher: &'a ResilientFetcher,
    config: &'a Config,
    seed: Url,
    scope: Scope,
}

impl<'a> AuditSession<'a> {
    pub fn new(fetcher: &'a ResilientFetcher, config: &'a Config, seed: Url, scope: Scope) -> Self {
        Self {
            fetcher,
            config,
            seed,
            scope,
        }
    }

    /// Fetches the seed, analyzes every target, and collects the outcomes
    ///
    /// Fails only when the seed itself cannot be fetched; individual page
    /// failures are recorded in the report.
    pub async fn run(&self) -> Result<SessionReport, AuditError> {
        info!("Starting {} audit of {}", self.scope, self.seed);

        let seed_page = self.fetch_seed().await?;

        let targets = match self.scope {
            Scope::Page => vec![self.seed.clone()],
            Scope::Site => discover_targets(&seed_page.text(), &self.seed, &self.config.audit),
        };
        info!("{} page(s) to analyze", targets.len());

        let siblings = match self.scope {
            Scope::Page => None,
            Scope::Site => {
                let urls: Vec<String> = targets.iter().map(Url::to_string).collect();
                let collisions = DuplicateDetector::new(self.fetcher, &self.config.audit)
                    .detect(&urls)
                    .await;
                if !collisions.is_empty() {
                    info!("Found {} duplicate content pair(s)", collisions.len());
                }
                Some(SiblingSet::new(collisions))
            }
        };

        let analyzer = PageAnalyzer::new(self.fetcher, &self.config.audit);
        let mut outcomes = Vec::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            info!("[{}/{}] Analyzing {}", index + 1, targets.len(), target);
            outcomes.push(analyzer.analyze(target, siblings.as_ref()).await);
        }

        let report = SessionReport {
            seed: self.seed.clone(),
            targets,
            outcomes,
        };
        info!(
            "Audit complete: {} completed, {} failed",
            report.completed().count(),
            report.failed_count()
        );
        Ok(report)
    }

    async fn fetch_seed(&self) -> Result<crate::fetch::FetchResult, AuditError> {
        let unavailable = |reason: String| AuditError::SeedUnavailable {
            url: self.seed.to_string(),
            reason,
        };

        match self.fetcher.get(self.seed.as_str()).await {
            Ok(FetchOutcome::Fetched(response)) if response.is_success() => Ok(response),
            Ok(FetchOutcome::Fetched(response)) => {
                Err(unavailable(format!("HTTP status {}", response.status)))
            }
            Ok(FetchOutcome::Unreachable { reason, .. }) => Err(unavailable(reason)),
            Err(e) => Err(unavailable(e.to_string())),
        }
    }
}
