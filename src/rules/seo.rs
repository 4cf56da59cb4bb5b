//! Structural SEO rules and page metadata

use super::{Category, Finding, RuleContext, RuleResult};
use crate::dom::{attr_non_empty, rel_contains, Document};

const TITLE_MIN_CHARS: usize = 30;
const TITLE_MAX_CHARS: usize = 60;
const DESCRIPTION_MIN_CHARS: usize = 70;
const DESCRIPTION_MAX_CHARS: usize = 160;

const OPEN_GRAPH_TAGS: [&str; 4] = ["og:title", "og:type", "og:image", "og:url"];
const SCHEMA_TYPES: [&str; 5] = ["Person", "Organization", "Product", "Article", "Event"];

/// Text markers left by the analytics.js, ga.js and gtag.js snippets
const ANALYTICS_TEXT_MARKERS: [&str; 2] = ["GoogleAnalyticsObject", "gtag('config'"];
const ANALYTICS_SCRIPT_HOSTS: [&str; 2] = ["google-analytics.com", "googletagmanager.com/gtag"];

/// Head metadata reported in the SEO summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub google_analytics: bool,
}

impl PageMetadata {
    pub fn extract(document: &Document) -> Self {
        Self {
            title: document.title(),
            meta_description: meta_content(document, "description"),
            meta_keywords: meta_content(document, "keywords"),
            google_analytics: has_google_analytics(document),
        }
    }
}

/// Trimmed `content` of `<meta name=...>`; Some("") when the tag has no content
fn meta_content(document: &Document, name: &str) -> Option<String> {
    document
        .find(|el| {
            el.value().name() == "meta"
                && el
                    .value()
                    .attr("name")
                    .map(|value| value.trim().eq_ignore_ascii_case(name))
                    .unwrap_or(false)
        })
        .first()
        .map(|el| el.value().attr("content").unwrap_or_default().trim().to_string())
}

fn has_google_analytics(document: &Document) -> bool {
    if ANALYTICS_TEXT_MARKERS
        .iter()
        .any(|marker| document.contains_text(marker))
    {
        return true;
    }
    !document
        .find(|el| {
            el.value().name() == "script"
                && el
                    .value()
                    .attr("src")
                    .map(|src| ANALYTICS_SCRIPT_HOSTS.iter().any(|host| src.contains(host)))
                    .unwrap_or(false)
        })
        .is_empty()
}

fn length_verdict(len: usize, min: usize) -> &'static str {
    if len < min {
        "too short"
    } else {
        "too long"
    }
}

pub fn check_title(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let Some(title) = document.title() else {
        return Ok(vec![Finding::new(Category::PageTitle, "No title found")]);
    };

    let len = title.chars().count();
    if (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Ok(Vec::new());
    }

    Ok(vec![Finding::new(
        Category::PageTitle,
        format!(
            "Title length is {}: {} characters",
            length_verdict(len, TITLE_MIN_CHARS),
            len
        ),
    )])
}

pub fn check_meta_description(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let Some(description) = meta_content(document, "description") else {
        return Ok(vec![Finding::new(
            Category::MetaDescription,
            "No meta description found",
        )]);
    };

    let len = description.chars().count();
    if (DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&len) {
        return Ok(Vec::new());
    }

    Ok(vec![Finding::new(
        Category::MetaDescription,
        format!(
            "Meta description length is {}: {} characters",
            length_verdict(len, DESCRIPTION_MIN_CHARS),
            len
        ),
    )])
}

pub fn check_h1(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let count = document.select("h1")?.len();
    let finding = match count {
        0 => Some(Finding::new(Category::H1, "No h1 tags found")),
        1 => None,
        n => Some(Finding::new(
            Category::H1,
            format!("Multiple h1 tags found: {}", n),
        )),
    };
    Ok(finding.into_iter().collect())
}

pub fn check_canonical(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let links = document.select("link")?;
    if links.iter().any(|link| rel_contains(link, "canonical")) {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(Category::Canonical, "No canonical tags found")])
}

pub fn check_hreflang(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let links = document.select("link[hreflang]")?;
    if links.iter().any(|link| rel_contains(link, "alternate")) {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(Category::Hreflang, "No hreflang tags found")])
}

pub fn check_favicon(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let links = document.select("link")?;
    if links.iter().any(|link| rel_contains(link, "icon")) {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(Category::Favicon, "No favicon (icon link) found")])
}

pub fn check_meta_keywords(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    if meta_content(document, "keywords").is_some() {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(Category::MetaKeywords, "No meta keywords found")])
}

pub fn check_google_analytics(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    if has_google_analytics(document) {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(
        Category::GoogleAnalytics,
        "Google Analytics not found",
    )])
}

pub fn check_language(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let declared = document
        .first("html")?
        .and_then(|html| attr_non_empty(&html, "lang"))
        .is_some();
    if declared {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(
        Category::Language,
        "The html element has no lang attribute",
    )])
}

pub fn check_url_length(_document: &Document, ctx: &RuleContext<'_>) -> RuleResult {
    let url = ctx.page_url.as_str();
    let len = url.chars().count();
    if len <= ctx.thresholds.max_url_length {
        return Ok(Vec::new());
    }
    Ok(vec![Finding::new(
        Category::LongUrl,
        format!("URL: {} | Length: {} characters", url, len),
    )])
}

pub fn check_open_graph(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let metas = document.select("meta[property]")?;
    let findings = OPEN_GRAPH_TAGS
        .iter()
        .filter(|tag| {
            !metas
                .iter()
                .any(|meta| meta.value().attr("property") == Some(**tag))
        })
        .map(|tag| Finding::new(Category::OpenGraph, format!("Missing Open Graph tag: {}", tag)))
        .collect();
    Ok(findings)
}

pub fn check_schema_microdata(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let typed = document.select("[itemtype]")?;
    let declared: Vec<&str> = typed
        .iter()
        .filter_map(|el| el.value().attr("itemtype"))
        .flat_map(str::split_whitespace)
        .collect();

    let findings = SCHEMA_TYPES
        .iter()
        .filter(|schema_type| {
            !declared.iter().any(|itemtype| {
                let bare = itemtype.trim_end_matches('/');
                bare == format!("http://schema.org/{}", schema_type)
                    || bare == format!("https://schema.org/{}", schema_type)
            })
        })
        .map(|schema_type| {
            Finding::new(
                Category::SchemaMicrodata,
                format!("Missing Schema.org type: {}", schema_type),
            )
        })
        .collect();
    Ok(findings)
}

/// Reports the duplicate pairs that involve this page
pub fn check_duplicate_content(_document: &Document, ctx: &RuleContext<'_>) -> RuleResult {
    let Some(collisions) = ctx.collisions else {
        return Ok(Vec::new());
    };

    let page = ctx.page_url.as_str();
    Ok(collisions
        .iter()
        .filter(|pair| pair.involves(page))
        .map(|pair| {
            Finding::new(
                Category::DuplicateContent,
                format!("{} and {}", pair.first, pair.second),
            )
        })
        .collect())
}

/// Builds the SEO summary lines shown at the top of a page report
pub fn summary_lines(
    metadata: &PageMetadata,
    internal_links: usize,
    external_links: usize,
    robots_url: &str,
    sitemap_url: Option<&str>,
) -> Vec<String> {
    vec![
        format!(
            "Title: {}",
            metadata.title.as_deref().unwrap_or("No title found")
        ),
        format!(
            "Meta description: {}",
            metadata
                .meta_description
                .as_deref()
                .unwrap_or("No meta description found")
        ),
        format!("Internal links: {}", internal_links),
        format!("External links: {}", external_links),
        format!("Robots URL: {}", robots_url),
        format!("Sitemap URL: {}", sitemap_url.unwrap_or("None")),
        format!(
            "Google Analytics: {}",
            if metadata.google_analytics {
                "Found"
            } else {
                "Not found"
            }
        ),
        format!(
            "Meta keywords: {}",
            metadata
                .meta_keywords
                .as_deref()
                .unwrap_or("No meta keywords found")
        ),
    ]
}
