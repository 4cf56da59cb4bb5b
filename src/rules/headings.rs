//! Heading outline and hierarchy rule

use super::{Category, Finding, RuleContext, RuleResult};
use crate::dom::{element_text, Document, DomError};

/// One heading in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    pub level: u8,
    pub text: String,
}

/// Every h1–h6 in document order
pub fn outline(document: &Document) -> Result<Vec<HeadingEntry>, DomError> {
    Ok(document
        .select("h1, h2, h3, h4, h5, h6")?
        .iter()
        .filter_map(|heading| {
            let level = heading.value().name().strip_prefix('h')?.parse().ok()?;
            Some(HeadingEntry {
                level,
                text: element_text(heading),
            })
        })
        .collect())
}

/// Index of the first heading that skips more than one level down
pub fn first_violation(outline: &[HeadingEntry]) -> Option<usize> {
    outline
        .windows(2)
        .position(|pair| pair[1].level > pair[0].level + 1)
        .map(|index| index + 1)
}

/// Outline as `hN: text` lines
pub fn render_outline(outline: &[HeadingEntry]) -> String {
    outline
        .iter()
        .map(|entry| format!("h{}: {}", entry.level, entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn check_heading_hierarchy(document: &Document, _ctx: &RuleContext<'_>) -> RuleResult {
    let headings = outline(document)?;
    let Some(index) = first_violation(&headings) else {
        return Ok(Vec::new());
    };

    let previous = &headings[index - 1];
    let offending = &headings[index];
    Ok(vec![Finding::new(
        Category::HeadingHierarchy,
        format!(
            "Heading hierarchy out of order: h{} \"{}\" follows h{} \"{}\"",
            offending.level, offending.text, previous.level, previous.text
        ),
    )])
}
