//! Merging per-page reports into the combined report
//!
//! Page documents are parsed back, their sections stable-sorted by
//! descending severity, and re-emitted with ids unique across the whole
//! combined document.

use super::escape::escape_html;
use super::page::{ACCORDION_SCRIPT, BASE_STYLE};
use crate::rules::Severity;
use scraper::{ElementRef, Html, Selector};
use std::cmp::Reverse;
use std::sync::LazyLock;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid selector"));
static ACCORDION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button.accordion").expect("valid selector"));
static PANEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.panel").expect("valid selector"));

const MERGE_STYLE: &str = r#".container { padding: 20px; }
.url-accordion { background-color: #f6f6f6; color: black; }
@media (max-width: 600px) {
    .accordion, .url-accordion { padding: 10px; font-size: 14px; }
    .panel p { padding: 5px 0; }
}
"#;

/// A section lifted out of a page report
struct Section<'a> {
    severity: Severity,
    accordion: ElementRef<'a>,
    panel: ElementRef<'a>,
}

/// Builds the combined report from rendered page documents
///
/// # Arguments
///
/// * `pages` - Page reports in analysis order, as produced by `render_page_report`
/// * `general_info` - Plain text shown as the first section
pub fn merge_reports(pages: &[String], general_info: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("<title>Combined Accessibility and SEO Audit Report</title>\n");
    html.push_str(&format!("<style>\n{}{}</style>\n", BASE_STYLE, MERGE_STYLE));
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");
    html.push_str("<h1>Combined accessibility and SEO audit report</h1>\n");
    html.push_str("<button class=\"accordion\">General information</button>\n");
    html.push_str(&format!(
        "<div class=\"panel\"><pre>{}</pre></div>\n",
        escape_html(general_info)
    ));

    for (page_index, page) in pages.iter().enumerate() {
        html.push_str(&merge_page(page_index, page));
    }

    html.push_str("</div>\n");
    html.push_str(ACCORDION_SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

fn merge_page(page_index: usize, page: &str) -> String {
    let document = Html::parse_document(page);

    let title = document
        .select(&TITLE)
        .next()
        .map(|h2| h2.text().collect::<String>())
        .unwrap_or_default();

    let mut sections: Vec<Section<'_>> = document
        .select(&ACCORDION)
        .zip(document.select(&PANEL))
        .map(|(accordion, panel)| Section {
            severity: Severity::from_token(accordion.value().attr("data-severity").unwrap_or("")),
            accordion,
            panel,
        })
        .collect();
    sections.sort_by_key(|section| Reverse(section.severity.rank()));

    let mut out = String::new();
    out.push_str(&format!(
        "<button class=\"accordion url-accordion\"><h2>{}</h2></button>\n<div class=\"panel\">\n",
        escape_html(&title)
    ));
    for (section_index, section) in sections.iter().enumerate() {
        let suffix = format!("{}-{}", page_index, section_index);
        out.push_str(&rebuild(&section.accordion, &format!("accordion-{}", suffix)));
        out.push_str(&rebuild(&section.panel, &format!("panel-{}", suffix)));
        out.push('\n');
    }
    out.push_str("</div>\n");
    out
}

/// Re-serializes `element` with a new id, keeping its other attributes
fn rebuild(element: &ElementRef<'_>, id: &str) -> String {
    let tag = element.value().name();
    let mut out = format!("<{} id=\"{}\"", tag, id);
    for (name, value) in element.value().attrs() {
        if name == "id" {
            continue;
        }
        out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    out.push('>');
    out.push_str(&element.inner_html());
    out.push_str(&format!("</{}>", tag));
    out
}
