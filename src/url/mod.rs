//! URL handling module for Site-Audit
//!
//! This module provides seed validation, link resolution, same-site checks
//! and asset detection.

mod domain;
mod normalize;

pub use domain::{extract_domain, same_site, site_origin};
pub use normalize::{is_asset_link, normalize_url, resolve_link};
