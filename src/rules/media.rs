//! Image rules and static asset discovery

use super::{Category, Finding, RuleContext, RuleResult, SNIPPET_CHARS};
use crate::dom::{attr_non_empty, rel_contains, snippet, Document, DomError};
use crate::url::{resolve_link, same_site};
use url::Url;

/// Kind of static asset checked for minification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

impl AssetKind {
    /// Category used when the asset is not minified
    pub fn category(&self) -> Category {
        match self {
            Self::Stylesheet => Category::UnminifiedCss,
            Self::Script => Category::UnminifiedJs,
        }
    }
}

/// A same-site stylesheet or script referenced by the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub kind: AssetKind,
    /// Reference as written in the page
    pub href: String,
    pub url: Url,
}

/// Same-site, non-`data:` stylesheets then scripts, in document order
pub fn same_site_assets(document: &Document, page_url: &Url) -> Result<Vec<AssetRef>, DomError> {
    let stylesheets = document
        .select("link[href]")?
        .into_iter()
        .filter(|link| rel_contains(link, "stylesheet"))
        .filter_map(|link| link.value().attr("href"))
        .map(|href| (AssetKind::Stylesheet, href));

    let scripts = document
        .select("script[src]")?
        .into_iter()
        .filter_map(|script| script.value().attr("src"))
        .map(|src| (AssetKind::Script, src));

    Ok(stylesheets
        .chain(scripts)
        .filter(|(_, href)| !href.trim().to_ascii_lowercase().starts_with("data:"))
        .filter_map(|(kind, href)| {
            let url = resolve_link(href, page_url)?;
            same_site(&url, page_url).then(|| AssetRef {
                kind,
                href: href.trim().to_string(),
                url,
            })
        })
        .collect())
}

/// Heuristic minification test
///
/// Content counts as minified when it has fewer than 5 lines and trimmed
/// line content makes up more than 90% of its characters. Empty content is
/// treated as minified.
pub fn is_minified(content: &str) -> bool {
    let total = content.chars().count();
    if total == 0 {
        return true;
    }

    let lines: Vec<&str> = content.lines().collect();
    let dense: usize = lines.iter().map(|line| line.trim().chars().count()).sum();
    lines.len() < 5 && dense as f64 / total as f64 > 0.9
}

pub fn check_alt_text(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .select("img")?
        .iter()
        .filter(|img| attr_non_empty(img, "alt").is_none())
        .map(|img| Finding::new(Category::MissingAltText, snippet(img, SNIPPET_CHARS)))
        .collect())
}

/// Images whose source is not WebP, unless the source names an exempt keyword
pub fn check_webp_images(document: &Document, ctx: &RuleContext<'_>) -> RuleResult {
    let exempt = &ctx.thresholds.image_exempt_keywords;

    Ok(document
        .select("img[src]")?
        .iter()
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| {
            let path = src.split(['?', '#']).next().unwrap_or_default();
            !path.to_ascii_lowercase().ends_with(".webp")
                && !exempt.iter().any(|keyword| src.contains(keyword.as_str()))
        })
        .map(|src| Finding::new(Category::NonWebpImages, src))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{messages, page_url, run};

    #[test]
    fn test_alt_text() {
        let html = r#"<img src="a.png" alt="A"><img src="b.png"><img src="c.png" alt="  ">"#;
        let findings = run(check_alt_text, html);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("b.png"));
    }

    #[test]
    fn test_webp_with_exempt_keywords() {
        let html = r#"
            <img src="/img/photo.jpg">
            <img src="/img/photo.webp?v=3">
            <img src="/img/site-logo.png">
            <img src="/wp-content/plugins/x/icon.gif">
            <img src="/img/banner.PNG">
        "#;
        let found = messages(&run(check_webp_images, html), Category::NonWebpImages);
        assert_eq!(found, ["/img/photo.jpg", "/img/banner.PNG"]);
    }

    #[test]
    fn test_minification_heuristic() {
        assert!(is_minified(""));
        assert!(is_minified("body{margin:0;padding:0}p{color:red}"));
        assert!(!is_minified("body {\n  margin: 0;\n}\n\np {\n  color: red;\n}\n"));
        assert!(!is_minified("        a{}\n\n\n"));
    }

    #[test]
    fn test_same_site_assets() {
        let doc = Document::parse(
            r#"<head>
                <link rel="stylesheet" href="/css/site.css">
                <link rel="stylesheet" href="https://cdn.example.net/lib.css">
                <link rel="stylesheet" href="data:text/css,p{}">
                <link rel="icon" href="/favicon.ico">
                <script src="/js/app.js"></script>
                <script>inline()</script>
            </head>"#,
        );
        let assets = same_site_assets(&doc, &page_url()).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].kind, AssetKind::Stylesheet);
        assert_eq!(assets[0].href, "/css/site.css");
        assert_eq!(assets[1].kind, AssetKind::Script);
        assert_eq!(assets[1].url.as_str(), "https://example.com/js/app.js");
        assert_eq!(assets[1].kind.category(), Category::UnminifiedJs);
    }
}
