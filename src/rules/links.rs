//! Anchor inventory and link rules

use super::{Category, Finding, RuleContext, RuleResult};
use crate::dom::{Document, DomError};
use crate::url::{resolve_link, same_site};
use url::Url;

/// Resolved anchors of a page, split by site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInventory {
    /// Same-site anchors in document order, duplicates kept
    pub internal: Vec<Url>,
    /// Number of anchors pointing at other sites
    pub external: usize,
}

impl LinkInventory {
    /// Collects every resolvable `<a href>` of the page
    pub fn collect(document: &Document, page_url: &Url) -> Result<Self, DomError> {
        let mut inventory = Self::default();

        for anchor in document.select("a[href]")? {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(link) = resolve_link(href, page_url) else {
                continue;
            };
            if same_site(&link, page_url) {
                inventory.internal.push(link);
            } else {
                inventory.external += 1;
            }
        }

        Ok(inventory)
    }

    /// Internal links with repeats removed, first occurrence first
    pub fn unique_internal(&self) -> Vec<Url> {
        let mut seen = std::collections::HashSet::new();
        self.internal
            .iter()
            .filter(|url| seen.insert(url.as_str().to_string()))
            .cloned()
            .collect()
    }
}

/// Same-site anchors that carry a non-empty query string
pub fn check_query_string_links(document: &Document, ctx: &RuleContext<'_>) -> RuleResult {
    let inventory = LinkInventory::collect(document, ctx.page_url)?;
    Ok(inventory
        .internal
        .iter()
        .filter(|link| link.query().map_or(false, |query| !query.is_empty()))
        .map(|link| Finding::new(Category::QueryStringLinks, link.as_str()))
        .collect())
}
