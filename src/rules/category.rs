//! Finding categories and severities
//!
//! The category set is closed: every finding belongs to exactly one
//! [`Category`], and each category has a fixed label and [`Severity`].

use std::collections::BTreeMap;
use std::fmt;

/// How urgent a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    High,
    Medium,
    Low,
    Good,
}

impl Severity {
    /// Sort rank, higher is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Good => 0,
        }
    }

    /// Token used in rendered reports (`data-severity`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Good => "good",
        }
    }

    /// Parses a report token; anything unrecognised counts as `Low`
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "good" => Self::Good,
            _ => Self::Low,
        }
    }

    /// Inline style for section headers of this severity
    pub fn style(&self) -> &'static str {
        match self {
            Self::High => "background-color: red; color: white;",
            Self::Medium => "background-color: orange; color: black;",
            Self::Low => "background-color: gold; color: black;",
            Self::Good => "background-color: #8ede3e; color: black;",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every kind of finding the audit can report
///
/// Declaration order is the order findings appear within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    MissingAltText,
    UnlabelledFormFields,
    EmptyButtons,
    UntitledIframes,
    ControlsWithoutAria,
    BrokenLinks,
    TableAccessibility,
    AriaRoleUsage,
    DuplicateContent,
    KeyboardEvents,
    FormAccessibility,
    BlinkingContent,
    SvgAccessibility,
    SmallFontSize,
    SlowLoad,
    LongUrl,
    Canonical,
    Hreflang,
    AriaLandmarks,
    SemanticStructure,
    OpenGraph,
    SchemaMicrodata,
    QueryStringLinks,
    NonWebpImages,
    HeadingHierarchy,
    PageTitle,
    MetaDescription,
    H1,
    Favicon,
    Robots,
    Sitemap,
    GoogleAnalytics,
    MetaKeywords,
    Language,
    UnminifiedCss,
    UnminifiedJs,
    UnresolvedColours,
    GoodContrast,
}

impl Category {
    pub const ALL: [Category; 38] = [
        Self::MissingAltText,
        Self::UnlabelledFormFields,
        Self::EmptyButtons,
        Self::UntitledIframes,
        Self::ControlsWithoutAria,
        Self::BrokenLinks,
        Self::TableAccessibility,
        Self::AriaRoleUsage,
        Self::DuplicateContent,
        Self::KeyboardEvents,
        Self::FormAccessibility,
        Self::BlinkingContent,
        Self::SvgAccessibility,
        Self::SmallFontSize,
        Self::SlowLoad,
        Self::LongUrl,
        Self::Canonical,
        Self::Hreflang,
        Self::AriaLandmarks,
        Self::SemanticStructure,
        Self::OpenGraph,
        Self::SchemaMicrodata,
        Self::QueryStringLinks,
        Self::NonWebpImages,
        Self::HeadingHierarchy,
        Self::PageTitle,
        Self::MetaDescription,
        Self::H1,
        Self::Favicon,
        Self::Robots,
        Self::Sitemap,
        Self::GoogleAnalytics,
        Self::MetaKeywords,
        Self::Language,
        Self::UnminifiedCss,
        Self::UnminifiedJs,
        Self::UnresolvedColours,
        Self::GoodContrast,
    ];

    /// Human-readable section title
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingAltText => "Images without alt text",
            Self::UnlabelledFormFields => "Form fields without label or aria-label",
            Self::EmptyButtons => "Buttons without text",
            Self::UntitledIframes => "iFrames without title",
            Self::ControlsWithoutAria => "Interactive elements without ARIA roles",
            Self::BrokenLinks => "Broken links (404)",
            Self::TableAccessibility => "Table accessibility",
            Self::AriaRoleUsage => "ARIA role usage",
            Self::DuplicateContent => "Possible duplicate content",
            Self::KeyboardEvents => "Keyboard events",
            Self::FormAccessibility => "Form accessibility",
            Self::BlinkingContent => "Blinking content",
            Self::SvgAccessibility => "SVG accessibility",
            Self::SmallFontSize => "Elements with font size below 16px",
            Self::SlowLoad => "Page load time",
            Self::LongUrl => "URLs too long",
            Self::Canonical => "Canonical tags",
            Self::Hreflang => "Hreflang tags",
            Self::AriaLandmarks => "ARIA landmarks",
            Self::SemanticStructure => "Semantic document structure",
            Self::OpenGraph => "Open Graph tags",
            Self::SchemaMicrodata => "Schema.org microdata",
            Self::QueryStringLinks => "Internal links with query parameters",
            Self::NonWebpImages => "Images not in WebP format",
            Self::HeadingHierarchy => "Heading hierarchy problems",
            Self::PageTitle => "Page title",
            Self::MetaDescription => "Meta description",
            Self::H1 => "H1",
            Self::Favicon => "Favicon",
            Self::Robots => "Robots",
            Self::Sitemap => "Sitemap",
            Self::GoogleAnalytics => "Google Analytics",
            Self::MetaKeywords => "Meta keywords",
            Self::Language => "Document language",
            Self::UnminifiedCss => "Unminified CSS",
            Self::UnminifiedJs => "Unminified JS",
            Self::UnresolvedColours => "Elements with unresolved colours",
            Self::GoodContrast => "Elements with good colour contrast",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingAltText
            | Self::UnlabelledFormFields
            | Self::EmptyButtons
            | Self::UntitledIframes
            | Self::ControlsWithoutAria
            | Self::BrokenLinks
            | Self::TableAccessibility
            | Self::AriaRoleUsage
            | Self::DuplicateContent
            | Self::KeyboardEvents
            | Self::FormAccessibility
            | Self::BlinkingContent
            | Self::SvgAccessibility => Severity::High,

            Self::SmallFontSize
            | Self::SlowLoad
            | Self::LongUrl
            | Self::Canonical
            | Self::Hreflang
            | Self::AriaLandmarks
            | Self::SemanticStructure => Severity::Medium,

            Self::GoodContrast => Severity::Good,

            _ => Severity::Low,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single reported observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: Category,
    pub message: String,
}

impl Finding {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.category.severity()
    }
}

/// Findings of one page grouped by category
///
/// Iteration follows [`Category`] declaration order; messages keep the order
/// in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindingSet {
    entries: BTreeMap<Category, Vec<String>>,
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.entries
            .entry(finding.category)
            .or_default()
            .push(finding.message);
    }

    /// Messages recorded for a category (empty if none)
    pub fn get(&self, category: Category) -> &[String] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: Category) -> usize {
        self.get(category).len()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.count(category) > 0
    }

    /// Non-empty categories with their messages, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        self.entries
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(category, messages)| (*category, messages.as_slice()))
    }

    /// Total number of findings
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<Finding> for FindingSet {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        for finding in iter {
            self.push(finding);
        }
    }
}

impl FromIterator<Finding> for FindingSet {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::High.rank() > Severity::Medium.rank());
        assert!(Severity::Medium.rank() > Severity::Low.rank());
        assert!(Severity::Low.rank() > Severity::Good.rank());
    }

    #[test]
    fn test_unknown_token_is_low() {
        assert_eq!(Severity::from_token("HIGH"), Severity::High);
        assert_eq!(Severity::from_token("info"), Severity::Low);
        assert_eq!(Severity::from_token(""), Severity::Low);
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(Category::MissingAltText.severity(), Severity::High);
        assert_eq!(Category::SvgAccessibility.severity(), Severity::High);
        assert_eq!(Category::SlowLoad.severity(), Severity::Medium);
        assert_eq!(Category::SemanticStructure.severity(), Severity::Medium);
        assert_eq!(Category::OpenGraph.severity(), Severity::Low);
        assert_eq!(Category::UnresolvedColours.severity(), Severity::Low);
        assert_eq!(Category::GoodContrast.severity(), Severity::Good);
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = Category::ALL.iter().map(Category::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Category::ALL.len());
    }

    #[test]
    fn test_finding_set_orders_by_category() {
        let set: FindingSet = vec![
            Finding::new(Category::Favicon, "no favicon"),
            Finding::new(Category::MissingAltText, "img one"),
            Finding::new(Category::MissingAltText, "img two"),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = set.iter().map(|(category, _)| category).collect();
        assert_eq!(order, vec![Category::MissingAltText, Category::Favicon]);
        assert_eq!(set.get(Category::MissingAltText), ["img one", "img two"]);
        assert_eq!(set.len(), 3);
        assert!(set.get(Category::Robots).is_empty());
    }
}
