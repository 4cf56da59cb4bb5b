//! Accessibility rules: tables, forms, ARIA, keyboard access, landmarks,
//! semantic structure, SVG, blinking content, buttons and iframes

use super::{Category, Finding, RuleContext, RuleResult, SNIPPET_CHARS};
use crate::dom::{
    attr_non_empty, element_text, has_aria_attribute, select_within, snippet, Document, DomError,
};
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Elements that are interactive without any ARIA help
const NATIVE_INTERACTIVE: [&str; 6] = ["button", "a", "input", "textarea", "select", "option"];
const POINTER_HANDLERS: [&str; 3] = ["onclick", "onkeydown", "onkeypress"];
const KEYBOARD_HANDLERS: [&str; 3] = ["onkeydown", "onkeypress", "onkeyup"];
const LANDMARK_ROLES: [&str; 4] = ["banner", "navigation", "main", "contentinfo"];
const SECTIONING_ELEMENTS: [&str; 4] = ["header", "nav", "main", "footer"];

static BLINK_ANIMATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"animation.*blink").expect("valid regex"));

/// Counts of ARIA-annotated elements on a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AriaCounts {
    /// Elements with at least one `aria-*` attribute
    pub aria_attributed: usize,
    /// Elements with a `role` attribute
    pub role_attributed: usize,
}

impl AriaCounts {
    pub fn collect(document: &Document) -> Self {
        document.elements().fold(Self::default(), |mut counts, el| {
            if has_aria_attribute(&el) {
                counts.aria_attributed += 1;
            }
            if el.value().attr("role").is_some() {
                counts.role_attributed += 1;
            }
            counts
        })
    }
}

pub fn check_tables(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let mut findings = Vec::new();

    for table in document.select("table")? {
        if select_within(&table, "thead")?.is_empty() {
            findings.push(Finding::new(
                Category::TableAccessibility,
                format!("Table without thead: {}", snippet(&table, SNIPPET_CHARS)),
            ));
        }
        if select_within(&table, "tbody")?.is_empty() {
            findings.push(Finding::new(
                Category::TableAccessibility,
                format!("Table without tbody: {}", snippet(&table, SNIPPET_CHARS)),
            ));
        }
        for th in select_within(&table, "th")? {
            if attr_non_empty(&th, "scope").is_none() {
                findings.push(Finding::new(
                    Category::TableAccessibility,
                    format!("th without scope: {}", snippet(&th, SNIPPET_CHARS)),
                ));
            }
        }
    }

    Ok(findings)
}

/// A form control together with the labels of its enclosing form
struct FormField<'a> {
    field: ElementRef<'a>,
    labels: Vec<ElementRef<'a>>,
}

impl FormField<'_> {
    /// True when the field has an id that no label targets and no aria-label
    fn lacks_label(&self) -> bool {
        let Some(id) = self.field.value().attr("id") else {
            return false;
        };
        let labelled = self
            .labels
            .iter()
            .any(|label| label.value().attr("for") == Some(id));
        !labelled && attr_non_empty(&self.field, "aria-label").is_none()
    }

    fn lacks_description(&self) -> bool {
        attr_non_empty(&self.field, "aria-describedby").is_none()
            && attr_non_empty(&self.field, "aria-label").is_none()
    }
}

fn form_fields(document: &Document) -> Result<Vec<FormField<'_>>, DomError> {
    let mut fields = Vec::new();
    for form in document.select("form")? {
        let labels = select_within(&form, "label")?;
        for field in select_within(&form, "input, textarea, select")? {
            fields.push(FormField {
                field,
                labels: labels.clone(),
            });
        }
    }
    Ok(fields)
}

/// Form fields with an id but neither a matching label nor an aria-label
pub fn check_unlabelled_fields(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(form_fields(document)?
        .iter()
        .filter(|field| field.lacks_label())
        .map(|field| Finding::new(Category::UnlabelledFormFields, field.field.html()))
        .collect())
}

pub fn check_form_accessibility(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let mut findings = Vec::new();

    for field in form_fields(document)? {
        if field.lacks_label() {
            findings.push(Finding::new(
                Category::FormAccessibility,
                format!(
                    "Form field without label or aria-label: {}",
                    snippet(&field.field, SNIPPET_CHARS)
                ),
            ));
        }
        if field.lacks_description() {
            findings.push(Finding::new(
                Category::FormAccessibility,
                format!(
                    "Form field without aria-describedby or aria-label: {}",
                    snippet(&field.field, SNIPPET_CHARS)
                ),
            ));
        }
    }

    Ok(findings)
}

/// Short description of an element by class, falling back to id
fn describe(element: &ElementRef<'_>) -> String {
    let name = element.value().name();
    match (
        attr_non_empty(element, "class"),
        attr_non_empty(element, "id"),
    ) {
        (Some(class), _) => format!("{} | class: {}", name, class),
        (None, Some(id)) => format!("{} | id: {}", name, id),
        (None, None) => name.to_string(),
    }
}

/// Non-native elements wired for interaction but carrying no ARIA attributes
pub fn check_aria_role_usage(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .find(|el| {
            !NATIVE_INTERACTIVE.contains(&el.value().name())
                && !has_aria_attribute(el)
                && POINTER_HANDLERS
                    .iter()
                    .any(|handler| attr_non_empty(el, handler).is_some())
        })
        .iter()
        .map(|el| {
            Finding::new(
                Category::AriaRoleUsage,
                format!("Interactive element without ARIA role: {}", describe(el)),
            )
        })
        .collect())
}

/// Native controls with neither `role` nor any `aria-*` attribute
pub fn check_controls_without_aria(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .select("button, input, select, textarea")?
        .iter()
        .filter(|el| el.value().attr("role").is_none() && !has_aria_attribute(el))
        .map(|el| {
            let text = element_text(el);
            let label = if text.is_empty() { describe(el) } else { text };
            Finding::new(Category::ControlsWithoutAria, label)
        })
        .collect())
}

/// Interactive elements with neither `tabindex` nor a keyboard handler
pub fn check_keyboard_events(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .select("button, a, input, textarea, select")?
        .iter()
        .filter(|el| {
            attr_non_empty(el, "tabindex").is_none()
                && !KEYBOARD_HANDLERS
                    .iter()
                    .any(|handler| attr_non_empty(el, handler).is_some())
        })
        .map(|el| {
            Finding::new(
                Category::KeyboardEvents,
                format!(
                    "Interactive element without keyboard events: {}",
                    snippet(el, SNIPPET_CHARS)
                ),
            )
        })
        .collect())
}

pub fn check_landmarks(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let roles: Vec<String> = document
        .select("[role]")?
        .iter()
        .filter_map(|el| el.value().attr("role"))
        .flat_map(str::split_whitespace)
        .map(str::to_ascii_lowercase)
        .collect();

    Ok(LANDMARK_ROLES
        .iter()
        .filter(|landmark| !roles.iter().any(|role| role == *landmark))
        .map(|landmark| {
            Finding::new(
                Category::AriaLandmarks,
                format!("Missing ARIA landmark: {}", landmark),
            )
        })
        .collect())
}

pub fn check_semantic_structure(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let mut findings = Vec::new();
    for tag in SECTIONING_ELEMENTS {
        if !document.exists(tag)? {
            findings.push(Finding::new(
                Category::SemanticStructure,
                format!("Missing semantic element: {}", tag),
            ));
        }
    }
    Ok(findings)
}

pub fn check_svg(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let mut findings = Vec::new();

    for svg in document.select("svg")? {
        if select_within(&svg, "title")?.is_empty() {
            findings.push(Finding::new(
                Category::SvgAccessibility,
                format!("SVG without title: {}", snippet(&svg, SNIPPET_CHARS)),
            ));
        }
        if select_within(&svg, "desc")?.is_empty() {
            findings.push(Finding::new(
                Category::SvgAccessibility,
                format!("SVG without description: {}", snippet(&svg, SNIPPET_CHARS)),
            ));
        }
    }

    Ok(findings)
}

pub fn check_blinking_content(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .select("[style]")?
        .iter()
        .filter(|el| {
            el.value()
                .attr("style")
                .map(|style| BLINK_ANIMATION.is_match(style))
                .unwrap_or(false)
        })
        .map(|el| {
            Finding::new(
                Category::BlinkingContent,
                format!(
                    "Element with blinking content: {}",
                    snippet(el, SNIPPET_CHARS)
                ),
            )
        })
        .collect())
}

pub fn check_empty_buttons(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .select("button")?
        .iter()
        .filter(|button| element_text(button).is_empty())
        .map(|button| Finding::new(Category::EmptyButtons, button.html()))
        .collect())
}

pub fn check_iframes(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    Ok(document
        .select("iframe")?
        .iter()
        .filter(|iframe| attr_non_empty(iframe, "title").is_none())
        .map(|iframe| Finding::new(Category::UntitledIframes, iframe.html()))
        .collect())
}
