//! Document model used by the rules
//!
//! - [`Document`]: parsed page with the excluded region removed
//! - [`style`]: `<style>` and inline declaration reading
//! - [`colour`]: colour keywords, hex values, WCAG contrast

pub mod colour;
mod document;
pub mod style;

pub use colour::{contrast_ratio, relative_luminance, ColourError, Rgb};
pub use document::{
    attr_non_empty, element_text, has_aria_attribute, parse_selector, rel_contains,
    select_within, snippet, Document, DomError,
};
pub use style::{font_size_px, parse_inline, parse_stylesheet, Properties, StyleRule, StyleSheet};
