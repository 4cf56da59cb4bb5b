//! Page analyzer - fetch, parse, evaluate one page
//!
//! Each page walks the [`PageState`] machine. Anything that stops the page
//! before `Done` becomes a [`PageOutcome::Failed`] carrying the reason; the
//! session keeps going with the next page.

use super::duplicates::SiblingSet;
use super::state::PageState;
use crate::config::AuditConfig;
use crate::dom::Document;
use crate::fetch::{FetchOutcome, FetchResult, ResilientFetcher};
use crate::rules::accessibility::AriaCounts;
use crate::rules::headings::{first_violation, outline, HeadingEntry};
use crate::rules::links::LinkInventory;
use crate::rules::probes::{run_probes, ProbeTargets};
use crate::rules::seo::{summary_lines, PageMetadata};
use crate::rules::{evaluate, Category, Finding, FindingSet, RuleContext};
use crate::AuditError;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Complete structured outcome of analyzing one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageAuditResult {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub findings: FindingSet,
    pub seo_summary: Vec<String>,
    pub heading_outline: Vec<HeadingEntry>,
    pub heading_hierarchy_ok: bool,
    pub sitemap_url: Option<String>,
    pub robots_url: String,
    pub aria_counts: AriaCounts,
    pub load_time: Duration,
    pub internal_links: usize,
    pub external_links: usize,
    /// Value of the `Server` response header
    pub server: Option<String>,
    pub google_analytics: bool,
}

/// Result of one page: either a full audit or the reason it stopped
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Completed(PageAuditResult),
    Failed { url: String, reason: String },
}

impl PageOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Completed(result) => &result.url,
            Self::Failed { url, .. } => url,
        }
    }

    pub fn as_completed(&self) -> Option<&PageAuditResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Everything derived from the parsed document before the probes run
struct Evaluation {
    findings: FindingSet,
    metadata: PageMetadata,
    links: LinkInventory,
    heading_outline: Vec<HeadingEntry>,
    aria_counts: AriaCounts,
    targets: ProbeTargets,
}

/// Analyzes single pages with a shared fetcher and thresholds
pub struct PageAnalyzer<'a> {
    fetcher: &'a ResilientFetcher,
    config: &'a AuditConfig,
}

impl<'a> PageAnalyzer<'a> {
    pub fn new(fetcher: &'a ResilientFetcher, config: &'a AuditConfig) -> Self {
        Self { fetcher, config }
    }

    /// Runs the full pipeline for `url`
    ///
    /// `siblings` is only given in site mode; without it the duplicate
    /// content rule has nothing to report.
    pub async fn analyze(&self, url: &Url, siblings: Option<&SiblingSet>) -> PageOutcome {
        let mut state = PageState::Fetching;

        match self.run(url, siblings, &mut state).await {
            Ok(result) => {
                debug!("{} finished in state {}", url, state);
                PageOutcome::Completed(result)
            }
            Err(reason) => {
                error!("Analysis of {} failed while {}: {}", url, state, reason);
                PageOutcome::Failed {
                    url: url.to_string(),
                    reason,
                }
            }
        }
    }

    async fn run(
        &self,
        url: &Url,
        siblings: Option<&SiblingSet>,
        state: &mut PageState,
    ) -> Result<PageAuditResult, String> {
        let response = match self.fetch_page(url).await {
            Ok(response) => response,
            Err(reason) => {
                advance(state, PageState::Failed)?;
                return Err(reason);
            }
        };
        info!(
            "Fetched {} ({}) in {:.2}s",
            url,
            response.status,
            response.elapsed.as_secs_f64()
        );

        advance(state, PageState::Parsing)?;
        let body = response.text();

        advance(state, PageState::Evaluating)?;
        // Document is not Send; keep it out of scope across the probe awaits.
        let evaluation = {
            let document = Document::parse_pruned(&body, self.config.excluded_region());
            let ctx = RuleContext {
                page_url: url,
                thresholds: self.config,
                collisions: siblings.map(SiblingSet::collisions),
            };
            match self.evaluate_document(&document, &ctx) {
                Ok(evaluation) => evaluation,
                Err(e) => {
                    advance(state, PageState::Failed)?;
                    return Err(e.to_string());
                }
            }
        };

        let Evaluation {
            mut findings,
            metadata,
            links,
            heading_outline,
            aria_counts,
            targets,
        } = evaluation;

        let probes = run_probes(self.fetcher, &targets).await;
        findings.extend(probes.findings);

        let load_time = response.elapsed;
        if load_time.as_secs_f64() > self.config.slow_page_secs {
            findings.push(Finding::new(
                Category::SlowLoad,
                format!("Load time: {:.2} seconds", load_time.as_secs_f64()),
            ));
        }

        let seo_summary = summary_lines(
            &metadata,
            links.internal.len(),
            links.external,
            &probes.robots_url,
            probes.sitemap_url.as_deref(),
        );

        advance(state, PageState::Done)?;

        Ok(PageAuditResult {
            url: url.to_string(),
            title: metadata.title,
            meta_description: metadata.meta_description,
            heading_hierarchy_ok: first_violation(&heading_outline).is_none(),
            findings,
            seo_summary,
            heading_outline,
            sitemap_url: probes.sitemap_url,
            robots_url: probes.robots_url,
            aria_counts,
            load_time,
            internal_links: links.internal.len(),
            external_links: links.external,
            server: response.header("server").map(str::to_string),
            google_analytics: metadata.google_analytics,
        })
    }

    async fn fetch_page(&self, url: &Url) -> Result<FetchResult, String> {
        match self.fetcher.get(url.as_str()).await {
            Ok(FetchOutcome::Fetched(response)) if response.is_success() => Ok(response),
            Ok(FetchOutcome::Fetched(response)) => Err(format!("HTTP status {}", response.status)),
            Ok(FetchOutcome::Unreachable { reason, .. }) => Err(format!("unreachable: {}", reason)),
            Err(e) => Err(e.to_string()),
        }
    }

    fn evaluate_document(
        &self,
        document: &Document,
        ctx: &RuleContext<'_>,
    ) -> Result<Evaluation, crate::dom::DomError> {
        let links = LinkInventory::collect(document, ctx.page_url)?;
        let targets = ProbeTargets::collect(document, ctx.page_url, &links)?;

        Ok(Evaluation {
            findings: evaluate(document, ctx),
            metadata: PageMetadata::extract(document),
            heading_outline: outline(document)?,
            aria_counts: AriaCounts::collect(document),
            links,
            targets,
        })
    }
}

fn advance(state: &mut PageState, next: PageState) -> Result<(), String> {
    *state = state
        .transition(next)
        .map_err(|e: AuditError| e.to_string())?;
    Ok(())
}
