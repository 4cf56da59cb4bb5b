//! Rules that need the network
//!
//! Targets are gathered from the document up front, then probed sequentially
//! through the resilient fetcher:
//! - same-site anchors: HEAD, `404` is a broken link
//! - `/robots.txt`: HEAD, anything but `200` counts as missing
//! - `/sitemap.xml`, then `/sitemap_index.xml`: first `200` wins
//! - same-site stylesheets and scripts: GET, checked for minification

use super::links::LinkInventory;
use super::media::{is_minified, same_site_assets, AssetRef};
use super::{Category, Finding};
use crate::dom::{Document, DomError};
use crate::fetch::{FetchOutcome, ResilientFetcher};
use crate::url::site_origin;
use tracing::debug;
use url::Url;

const SITEMAP_PATHS: [&str; 2] = ["/sitemap.xml", "/sitemap_index.xml"];

/// Everything the probes will request for one page
#[derive(Debug, Clone)]
pub struct ProbeTargets {
    pub links: Vec<Url>,
    pub assets: Vec<AssetRef>,
    pub robots_url: String,
    pub sitemap_candidates: Vec<String>,
}

impl ProbeTargets {
    pub fn collect(
        document: &Document,
        page_url: &Url,
        links: &LinkInventory,
    ) -> Result<Self, DomError> {
        let origin = site_origin(page_url);
        Ok(Self {
            links: links.unique_internal(),
            assets: same_site_assets(document, page_url)?,
            robots_url: format!("{}/robots.txt", origin),
            sitemap_candidates: SITEMAP_PATHS
                .iter()
                .map(|path| format!("{}{}", origin, path))
                .collect(),
        })
    }
}

/// Results of probing one page
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub findings: Vec<Finding>,
    pub robots_url: String,
    pub robots_found: bool,
    pub sitemap_url: Option<String>,
}

/// Runs every probe in a fixed order
pub async fn run_probes(fetcher: &ResilientFetcher, targets: &ProbeTargets) -> ProbeReport {
    let mut report = ProbeReport {
        robots_url: targets.robots_url.clone(),
        ..ProbeReport::default()
    };

    report
        .findings
        .extend(probe_broken_links(fetcher, &targets.links).await);

    report.robots_found = head_is_ok(fetcher, &targets.robots_url).await;
    if !report.robots_found {
        report.findings.push(Finding::new(
            Category::Robots,
            "No robots.txt file found",
        ));
    }

    report.sitemap_url = find_sitemap(fetcher, &targets.sitemap_candidates).await;
    if report.sitemap_url.is_none() {
        report.findings.push(Finding::new(
            Category::Sitemap,
            "Neither sitemap.xml nor sitemap_index.xml found",
        ));
    }

    report
        .findings
        .extend(probe_minification(fetcher, &targets.assets).await);

    report
}

/// HEADs each link and reports those answering `404`
pub async fn probe_broken_links(fetcher: &ResilientFetcher, links: &[Url]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for link in links {
        match fetcher.head(link.as_str()).await {
            Ok(FetchOutcome::Fetched(response)) if response.status == 404 => {
                findings.push(Finding::new(Category::BrokenLinks, link.as_str()));
            }
            Ok(FetchOutcome::Fetched(_)) => {}
            Ok(FetchOutcome::Unreachable { reason, .. }) => {
                debug!("Skipping link {}: unreachable ({})", link, reason);
            }
            Err(e) => debug!("Skipping link {}: {}", link, e),
        }
    }

    findings
}

async fn head_is_ok(fetcher: &ResilientFetcher, url: &str) -> bool {
    match fetcher.head(url).await {
        Ok(FetchOutcome::Fetched(response)) => response.status == 200,
        Ok(FetchOutcome::Unreachable { reason, .. }) => {
            debug!("{} unreachable: {}", url, reason);
            false
        }
        Err(e) => {
            debug!("{} probe failed: {}", url, e);
            false
        }
    }
}

/// First candidate answering `200` to HEAD
pub async fn find_sitemap(fetcher: &ResilientFetcher, candidates: &[String]) -> Option<String> {
    for candidate in candidates {
        if head_is_ok(fetcher, candidate).await {
            return Some(candidate.clone());
        }
    }
    None
}

/// GETs each asset; unminified bodies and fetch failures become findings
pub async fn probe_minification(fetcher: &ResilientFetcher, assets: &[AssetRef]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for asset in assets {
        let category = asset.kind.category();
        match fetcher.get(asset.url.as_str()).await {
            Ok(FetchOutcome::Fetched(response)) => {
                if response.status == 200 && !is_minified(&response.text()) {
                    findings.push(Finding::new(category, asset.href.clone()));
                }
            }
            Ok(FetchOutcome::Unreachable { reason, .. }) => {
                findings.push(Finding::new(
                    category,
                    format!("{} (error: unreachable: {})", asset.href, reason),
                ));
            }
            Err(e) => {
                findings.push(Finding::new(
                    category,
                    format!("{} (error: {})", asset.href, e),
                ));
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_targets() {
        let page = Url::parse("http://127.0.0.1:8080/blog/post").unwrap();
        let doc = Document::parse(
            r#"<a href="/a">A</a><a href="/a">A</a><a href="https://other.org/">O</a>
               <script src="/app.js"></script>"#,
        );
        let links = LinkInventory::collect(&doc, &page).unwrap();
        let targets = ProbeTargets::collect(&doc, &page, &links).unwrap();

        assert_eq!(targets.links.len(), 1);
        assert_eq!(targets.assets.len(), 1);
        assert_eq!(targets.robots_url, "http://127.0.0.1:8080/robots.txt");
        assert_eq!(
            targets.sitemap_candidates,
            [
                "http://127.0.0.1:8080/sitemap.xml",
                "http://127.0.0.1:8080/sitemap_index.xml"
            ]
        );
    }
}
