//! Content fingerprints
//!
//! SHA-256 digests rendered as lowercase hex. Used for duplicate-content
//! detection, config hashes, and stable per-page report file names.

use sha2::{Digest, Sha256};

/// Computes the hex-encoded SHA-256 digest of `bytes`
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Returns the file name used for a page's standalone report
///
/// ```
/// use site_audit::digest::report_file_name;
///
/// let name = report_file_name("https://example.com/");
/// assert!(name.starts_with("report_") && name.ends_with(".html"));
/// ```
pub fn report_file_name(url: &str) -> String {
    format!("report_{}.html", content_digest(url.as_bytes()))
}
