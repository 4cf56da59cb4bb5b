//! Parsed HTML document
//!
//! Thin wrapper over `scraper::Html` that owns one page's tree and offers the
//! queries the rules need. The excluded region is detached at parse time, so
//! no rule ever sees it.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors raised while querying a document
#[derive(Debug, Clone, Error)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}

/// Elements whose text never reaches the reader
const HIDDEN_TEXT_CONTAINERS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

impl Document {
    /// Parses a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parses a document and removes every element whose id is `excluded_id`
    pub fn parse_pruned(source: &str, excluded_id: Option<&str>) -> Self {
        let mut document = Self::parse(source);
        if let Some(id) = excluded_id {
            document.prune_by_id(id);
        }
        document
    }

    /// Detaches every element with the given id, returning how many were removed
    pub fn prune_by_id(&mut self, id: &str) -> usize {
        let targets: Vec<_> = self
            .html
            .tree
            .root()
            .descendants()
            .filter(|node| node.value().as_element().and_then(|el| el.id()) == Some(id))
            .map(|node| node.id())
            .collect();

        for node_id in &targets {
            if let Some(mut node) = self.html.tree.get_mut(*node_id) {
                node.detach();
            }
        }

        targets.len()
    }

    /// Returns all elements matching a CSS selector, in document order
    ///
    /// Matching walks the attached tree, so pruned elements never match.
    /// `Html::select` scans the whole node arena, detached nodes included.
    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, DomError> {
        let selector = parse_selector(css)?;
        Ok(self.elements().filter(|el| selector.matches(el)).collect())
    }

    /// Returns the first element matching a CSS selector
    pub fn first(&self, css: &str) -> Result<Option<ElementRef<'_>>, DomError> {
        let selector = parse_selector(css)?;
        Ok(self.elements().find(|el| selector.matches(el)))
    }

    /// Returns true if any element matches the selector
    pub fn exists(&self, css: &str) -> Result<bool, DomError> {
        Ok(self.first(css)?.is_some())
    }

    /// Every element in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.html.root_element().descendants().filter_map(ElementRef::wrap)
    }

    /// Returns every element satisfying `predicate`, in document order
    pub fn find<F>(&self, predicate: F) -> Vec<ElementRef<'_>>
    where
        F: Fn(&ElementRef<'_>) -> bool,
    {
        self.elements().filter(|el| predicate(el)).collect()
    }

    /// Returns true if any text node (scripts included) contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_text())
            .any(|text| text.contains(needle))
    }

    /// Trimmed text of the first `<title>` element
    pub fn title(&self) -> Option<String> {
        self.first("title").ok().flatten().map(|el| element_text(&el))
    }

    /// Reader-visible text: trimmed text nodes outside script-like containers,
    /// joined by single spaces
    pub fn visible_text(&self) -> String {
        let mut parts = Vec::new();

        for node in self.html.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| HIDDEN_TEXT_CONTAINERS.contains(&el.name()))
                    .unwrap_or(false)
            });
            if hidden {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }

        parts.join(" ")
    }
}

/// Compiles a CSS selector
pub fn parse_selector(css: &str) -> Result<Selector, DomError> {
    Selector::parse(css).map_err(|e| DomError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Returns descendants of `element` matching a CSS selector
pub fn select_within<'a>(element: &ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>, DomError> {
    let selector = parse_selector(css)?;
    Ok(element.select(&selector).collect())
}

/// Concatenated, trimmed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Outer HTML of an element, truncated to `max_chars` characters
pub fn snippet(element: &ElementRef<'_>, max_chars: usize) -> String {
    let html = element.html();
    match html.char_indices().nth(max_chars) {
        Some((end, _)) => html[..end].to_string(),
        None => html,
    }
}

/// Attribute value, ignoring attributes that are empty or whitespace
pub fn attr_non_empty<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .filter(|value| !value.trim().is_empty())
}

/// Returns true if the element carries any `aria-*` attribute
pub fn has_aria_attribute(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .attrs()
        .any(|(name, _)| name.starts_with("aria-"))
}

/// Returns true if the element's `rel` attribute lists `token`
pub fn rel_contains(element: &ElementRef<'_>, token: &str) -> bool {
    element
        .value()
        .attr("rel")
        .map(|rel| {
            rel.split_whitespace()
                .any(|part| part.eq_ignore_ascii_case(token))
        })
        .unwrap_or(false)
}
