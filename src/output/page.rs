//! Per-page HTML report
//!
//! Each page report is a standalone document: an `<h2>` with the URL followed
//! by `button.accordion` / `div.panel` pairs. The merge step relies on that
//! shape and on the `data-severity` token carried by every button.

use super::escape::escape_html;
use crate::audit::PageAuditResult;
use crate::rules::headings::render_outline;
use crate::rules::Category;

/// Severity token for sections that are not findings; sorts like `low`
const INFO_SEVERITY: &str = "info";

pub(crate) const ACCORDION_SCRIPT: &str = r#"<script>
document.addEventListener("DOMContentLoaded", function() {
    var acc = document.getElementsByClassName("accordion");
    for (var i = 0; i < acc.length; i++) {
        acc[i].addEventListener("click", function() {
            this.classList.toggle("active");
            var panel = this.nextElementSibling;
            if (panel.style.display === "block") {
                panel.style.display = "none";
            } else {
                panel.style.display = "block";
            }
        });
    }
});
</script>
"#;

pub(crate) const BASE_STYLE: &str = r#"body { font-family: Arial, sans-serif; }
.accordion { cursor: pointer; padding: 18px; width: 100%; text-align: left; border: none; outline: none; transition: 0.4s; background-color: #eee; margin-bottom: 10px; }
.accordion:hover, .active { background-color: #ccc; }
.panel { padding: 0 18px; display: none; background-color: white; overflow: hidden; }
.panel p { margin: 0; padding: 10px 0; border-bottom: 1px solid #ddd; }
.problem-list { margin: 0; padding-left: 20px; list-style-type: decimal; }
pre { white-space: pre-wrap; word-wrap: break-word; }
"#;

/// Renders one page's findings as a self-contained HTML document
pub fn render_page_report(result: &PageAuditResult) -> String {
    let url = escape_html(&result.url);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!(
        "<title>Accessibility and SEO Audit Report for {}</title>\n",
        url
    ));
    html.push_str(&format!("<style>\n{}</style>\n", BASE_STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>Accessibility and SEO audit report</h1>\n");
    html.push_str(&format!("<h2>URL: {}</h2>\n", url));

    // Heading hierarchy is always shown, with the outline
    html.push_str(&format!(
        "<button class=\"accordion\" data-severity=\"{}\">Heading hierarchy ({})</button>",
        INFO_SEVERITY,
        if result.heading_hierarchy_ok {
            "No errors"
        } else {
            "Error"
        }
    ));
    html.push_str(&format!(
        "<div class=\"panel\"><pre>{}</pre></div>\n",
        escape_html(&render_outline(&result.heading_outline))
    ));

    html.push_str(&format!(
        "<button class=\"accordion\" data-severity=\"{}\">SEO summary</button>",
        INFO_SEVERITY
    ));
    html.push_str(&format!(
        "<div class=\"panel\"><pre>{}</pre></div>\n",
        escape_html(&result.seo_summary.join("\n"))
    ));

    for (category, messages) in result.findings.iter() {
        let severity = category.severity();
        html.push_str(&format!(
            "<button class=\"accordion\" data-severity=\"{}\" style=\"{}\">{} ({})</button>",
            severity.as_str(),
            severity.style(),
            escape_html(category.label()),
            messages.len()
        ));
        html.push_str("<div class=\"panel\">");
        if category == Category::KeyboardEvents {
            html.push_str("<ul class=\"problem-list\">");
            for message in messages {
                html.push_str(&format!("<li>{}</li>", escape_html(message)));
            }
            html.push_str("</ul>");
        } else {
            for message in messages {
                html.push_str(&format!("<p>{}</p>", escape_html(message)));
            }
        }
        html.push_str("</div>\n");
    }

    html.push_str(ACCORDION_SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::accessibility::AriaCounts;
    use crate::rules::headings::HeadingEntry;
    use crate::rules::{Finding, FindingSet};
    use std::time::Duration;

    fn result(findings: Vec<Finding>) -> PageAuditResult {
        PageAuditResult {
            url: "https://example.com/?a=1&b=2".to_string(),
            title: Some("Home".to_string()),
            meta_description: None,
            findings: findings.into_iter().collect::<FindingSet>(),
            seo_summary: vec!["Title: Home".to_string()],
            heading_outline: vec![
                HeadingEntry {
                    level: 1,
                    text: "Top".to_string(),
                },
                HeadingEntry {
                    level: 3,
                    text: "<Deep>".to_string(),
                },
            ],
            heading_hierarchy_ok: false,
            sitemap_url: None,
            robots_url: "https://example.com/robots.txt".to_string(),
            aria_counts: AriaCounts::default(),
            load_time: Duration::from_millis(120),
            internal_links: 0,
            external_links: 0,
            server: None,
            google_analytics: false,
        }
    }

    #[test]
    fn test_sections_and_escaping() {
        let html = render_page_report(&result(vec![
            Finding::new(Category::MissingAltText, r#"<img src="a.png">"#),
            Finding::new(Category::MissingAltText, "second"),
        ]));

        assert!(html.contains("<h2>URL: https://example.com/?a=1&amp;b=2</h2>"));
        assert!(html.contains("Heading hierarchy (Error)"));
        assert!(html.contains("h3: &lt;Deep&gt;"));
        assert!(html.contains(r#"data-severity="high""#));
        assert!(html.contains("Images without alt text (2)"));
        assert!(html.contains("<p>&lt;img src=&quot;a.png&quot;&gt;</p>"));
        assert!(!html.contains(r#"<img src="a.png">"#));
    }

    #[test]
    fn test_keyboard_findings_are_listed() {
        let html = render_page_report(&result(vec![Finding::new(
            Category::KeyboardEvents,
            "Interactive element without keyboard events: <div>",
        )]));
        assert!(html.contains(r#"<ul class="problem-list"><li>Interactive element"#));
    }

    #[test]
    fn test_empty_categories_are_omitted() {
        let html = render_page_report(&result(Vec::new()));
        assert_eq!(html.matches("class=\"accordion\"").count(), 2);
    }
}
