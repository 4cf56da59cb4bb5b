//! Minimal CSS reading
//!
//! Only what the text-styling rule needs: top-level style rules from
//! `<style>` blocks, inline `style` declarations, and font-size conversion.
//! At-rules (`@media`, `@font-face`, …) are skipped with their bodies.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Property name → value, later declarations overriding earlier ones
pub type Properties = BTreeMap<String, String>;

/// Root font size used to resolve relative units
pub const BASE_FONT_PX: f64 = 16.0;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static FONT_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?|\.\d+)\s*(px|rem|em|pt|%)?\s*$").expect("valid regex")
});

/// One top-level style rule
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub properties: Properties,
}

/// Parses a stylesheet into its top-level style rules, in source order
pub fn parse_stylesheet(css: &str) -> Vec<StyleRule> {
    let cleaned = COMMENT.replace_all(css, "");
    let mut rules = Vec::new();
    let mut rest: &str = &cleaned;

    while let Some(open) = rest.find('{') {
        // Statements such as `@import ...;` end before the prelude
        let prelude = rest[..open].rsplit(';').next().unwrap_or_default().trim();
        let body_start = open + 1;
        let Some(close) = matching_brace(&rest[body_start..]) else {
            break;
        };

        if !prelude.is_empty() && !prelude.starts_with('@') {
            rules.push(StyleRule {
                selector: prelude.to_string(),
                properties: parse_declarations(&rest[body_start..body_start + close]),
            });
        }

        rest = &rest[body_start + close + 1..];
    }

    rules
}

/// Offset of the `}` closing a block whose `{` was just consumed
fn matching_brace(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (index, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a declaration block (`name: value; ...`)
pub fn parse_declarations(block: &str) -> Properties {
    let mut properties = Properties::new();

    for declaration in block.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = strip_important(value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        properties.insert(name, value.to_string());
    }

    properties
}

/// Parses the contents of an inline `style` attribute
pub fn parse_inline(style: &str) -> Properties {
    parse_declarations(&COMMENT.replace_all(style, ""))
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(index) if lower[index..].trim() == "!important" => value[..index].trim_end(),
        _ => value,
    }
}

/// All style rules gathered from a page's `<style>` elements
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Builds a sheet from several stylesheet sources, in order
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = sources
            .into_iter()
            .flat_map(|source| parse_stylesheet(source.as_ref()))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Properties from every rule whose selector list names `tag` directly
    pub fn tag_properties(&self, tag: &str) -> Properties {
        let mut merged = Properties::new();
        for rule in &self.rules {
            let matches = rule
                .selector
                .split(',')
                .any(|entry| entry.trim().eq_ignore_ascii_case(tag));
            if matches {
                merged.extend(rule.properties.clone());
            }
        }
        merged
    }
}

/// Resolves a `font-size` value to pixels
///
/// Supports px (or a bare number), em/rem and % relative to 16px, and pt.
/// Keywords and `calc()` resolve to `None`.
///
/// ```
/// use site_audit::dom::font_size_px;
///
/// assert_eq!(font_size_px("12px"), Some(12.0));
/// assert_eq!(font_size_px("0.75em"), Some(12.0));
/// assert_eq!(font_size_px("small"), None);
/// ```
pub fn font_size_px(value: &str) -> Option<f64> {
    let captures = FONT_SIZE.captures(value)?;
    let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures
        .get(2)
        .map(|unit| unit.as_str().to_ascii_lowercase());

    let px = match unit.as_deref() {
        None | Some("px") => amount,
        Some("em") | Some("rem") => amount * BASE_FONT_PX,
        Some("pt") => amount * 4.0 / 3.0,
        Some("%") => amount / 100.0 * BASE_FONT_PX,
        Some(_) => return None,
    };
    Some(px)
}
