//! Audit rules
//!
//! Document rules are plain functions over a pruned [`Document`]; they run in
//! the fixed order of [`catalogue`] and never touch the network. Rules that
//! need HTTP (link health, robots/sitemap, minification) live in [`probes`].

pub mod accessibility;
mod category;
pub mod headings;
pub mod links;
pub mod media;
pub mod probes;
pub mod seo;
pub mod styling;

pub use category::{Category, Finding, FindingSet, Severity};

use crate::audit::DuplicatePair;
use crate::config::AuditConfig;
use crate::dom::{Document, DomError};
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Outer HTML of offending elements is cut to this many characters
pub const SNIPPET_CHARS: usize = 100;

/// Errors a rule can raise instead of findings
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    #[error(transparent)]
    Selector(#[from] DomError),
}

/// Everything a rule may consult besides the document
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub page_url: &'a Url,
    pub thresholds: &'a AuditConfig,
    /// Duplicate pairs for the whole page set; None in single-page mode
    pub collisions: Option<&'a [DuplicatePair]>,
}

pub type RuleResult = Result<Vec<Finding>, RuleError>;

/// A named document rule
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&Document, &RuleContext<'_>) -> RuleResult,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

const CATALOGUE: &[Rule] = &[
    Rule { name: "url-length", check: seo::check_url_length },
    Rule { name: "canonical", check: seo::check_canonical },
    Rule { name: "hreflang", check: seo::check_hreflang },
    Rule { name: "tables", check: accessibility::check_tables },
    Rule { name: "aria-role-usage", check: accessibility::check_aria_role_usage },
    Rule { name: "duplicate-content", check: seo::check_duplicate_content },
    Rule { name: "keyboard-events", check: accessibility::check_keyboard_events },
    Rule { name: "landmarks", check: accessibility::check_landmarks },
    Rule { name: "semantic-structure", check: accessibility::check_semantic_structure },
    Rule { name: "form-accessibility", check: accessibility::check_form_accessibility },
    Rule { name: "blinking-content", check: accessibility::check_blinking_content },
    Rule { name: "svg", check: accessibility::check_svg },
    Rule { name: "open-graph", check: seo::check_open_graph },
    Rule { name: "schema-microdata", check: seo::check_schema_microdata },
    Rule { name: "query-string-links", check: links::check_query_string_links },
    Rule { name: "title", check: seo::check_title },
    Rule { name: "meta-description", check: seo::check_meta_description },
    Rule { name: "h1", check: seo::check_h1 },
    Rule { name: "favicon", check: seo::check_favicon },
    Rule { name: "google-analytics", check: seo::check_google_analytics },
    Rule { name: "meta-keywords", check: seo::check_meta_keywords },
    Rule { name: "language", check: seo::check_language },
    Rule { name: "alt-text", check: media::check_alt_text },
    Rule { name: "webp-images", check: media::check_webp_images },
    Rule { name: "unlabelled-fields", check: accessibility::check_unlabelled_fields },
    Rule { name: "heading-hierarchy", check: headings::check_heading_hierarchy },
    Rule { name: "empty-buttons", check: accessibility::check_empty_buttons },
    Rule { name: "iframes", check: accessibility::check_iframes },
    Rule { name: "controls-without-aria", check: accessibility::check_controls_without_aria },
    Rule { name: "text-styling", check: styling::check_text_styling },
];

/// Document rules in evaluation order
pub fn catalogue() -> &'static [Rule] {
    CATALOGUE
}

/// Runs every document rule, logging and skipping rules that fail
pub fn evaluate(document: &Document, ctx: &RuleContext<'_>) -> FindingSet {
    let mut findings = FindingSet::new();

    for rule in catalogue() {
        match (rule.check)(document, ctx) {
            Ok(found) => findings.extend(found),
            Err(e) => warn!("Rule {} failed on {}: {}", rule.name, ctx.page_url, e),
        }
    }

    findings
}


#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html><html lang="en"><head>
        <title>A reasonably descriptive page title here</title>
        <style>p { font-size: 12px; color: silver; }</style>
        </head><body>
        <h1>Main</h1><h3>Skipped</h3>
        <p>Small print</p>
        <img src="/photo.png">
        <button></button>
        <a href="/other?x=1">Other</a>
        </body></html>"#;

    fn evaluate_page() -> FindingSet {
        let url = Url::parse("https://example.com/").unwrap();
        let thresholds = AuditConfig::default();
        let ctx = RuleContext {
            page_url: &url,
            thresholds: &thresholds,
            collisions: None,
        };
        evaluate(&Document::parse(PAGE), &ctx)
    }

    #[test]
    fn test_rules_skip_excluded_region() {
        let url = Url::parse("https://example.com/").unwrap();
        let thresholds = AuditConfig::default();
        let ctx = RuleContext {
            page_url: &url,
            thresholds: &thresholds,
            collisions: None,
        };
        let document = Document::parse_pruned(
            r#"<img src="/a.webp" alt="ok">
               <div id="footer-page"><img src="/f.png"><button></button><a href="/f?x=1">F</a></div>"#,
            thresholds.excluded_region(),
        );

        let findings = evaluate(&document, &ctx);
        assert!(!findings.contains(Category::MissingAltText));
        assert!(!findings.contains(Category::NonWebpImages));
        assert!(!findings.contains(Category::EmptyButtons));
        assert!(!findings.contains(Category::QueryStringLinks));
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = catalogue().iter().map(|rule| rule.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalogue().len());
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        assert_eq!(evaluate_page(), evaluate_page());
    }

    #[test]
    fn test_evaluate_collects_across_rules() {
        let findings = evaluate_page();
        assert!(findings.contains(Category::MissingAltText));
        assert!(findings.contains(Category::EmptyButtons));
        assert!(findings.contains(Category::HeadingHierarchy));
        assert!(findings.contains(Category::QueryStringLinks));
        assert!(findings.contains(Category::SmallFontSize));
        assert!(!findings.contains(Category::PageTitle));
        assert!(!findings.contains(Category::Language));
        assert!(!findings.contains(Category::DuplicateContent));
    }
}
