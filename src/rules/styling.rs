//! Text styling rule: font size and colour contrast
//!
//! Effective styles come from `<style>` rules whose selector names the tag,
//! overridden by the element's inline `style`. Unset values fall back to
//! 16px black text on white. Elements without text are not checked.

use super::{Category, Finding, RuleContext, RuleResult};
use crate::dom::{
    contrast_ratio, element_text, font_size_px, parse_inline, Document, Rgb, StyleSheet,
};
use tracing::debug;

const TEXT_TAGS: &str = "p, span, a, h1, h2, h3, h4, h5, h6, li, ul";

const DEFAULT_FONT_SIZE: &str = "16px";
const DEFAULT_COLOUR: &str = "#000000";
const DEFAULT_BACKGROUND: &str = "#ffffff";

pub fn check_text_styling(document: &Document, ctx: &RuleContext<'_>) -> RuleResult {
    let sources: Vec<String> = document
        .select("style")?
        .iter()
        .map(|style| style.text().collect::<String>())
        .collect();
    let sheet = StyleSheet::from_sources(&sources);

    let mut findings = Vec::new();

    for element in document.select(TEXT_TAGS)? {
        let text = element_text(&element);
        if text.is_empty() {
            continue;
        }

        let tag = element.value().name();
        let mut properties = sheet.tag_properties(tag);
        if let Some(inline) = element.value().attr("style") {
            properties.extend(parse_inline(inline));
        }

        let font_size = properties
            .get("font-size")
            .map(String::as_str)
            .unwrap_or(DEFAULT_FONT_SIZE);
        let colour = properties
            .get("color")
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOUR);
        let background = properties
            .get("background-color")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BACKGROUND);

        match font_size_px(font_size) {
            Some(px) if px < ctx.thresholds.min_font_size_px => {
                findings.push(Finding::new(
                    Category::SmallFontSize,
                    format!("Text: {} | Font size: {}", text, font_size),
                ));
            }
            Some(_) => {}
            None => debug!("Unresolved font size {:?} on {} element", font_size, tag),
        }

        match (Rgb::parse(colour), Rgb::parse(background)) {
            (Ok(fg), Ok(bg)) => {
                let ratio = contrast_ratio(fg, bg);
                if ratio > ctx.thresholds.contrast_threshold {
                    findings.push(Finding::new(
                        Category::GoodContrast,
                        format!("Text: {} | Contrast: {:.2}", text, ratio),
                    ));
                }
            }
            _ => findings.push(Finding::new(
                Category::UnresolvedColours,
                format!(
                    "Element {} has colours that cannot be evaluated: color {}, background {}",
                    tag, colour, background
                ),
            )),
        }
    }

    Ok(findings)
}
