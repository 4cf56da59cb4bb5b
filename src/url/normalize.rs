use crate::UrlError;
use url::Url;

/// Schemes that never point at an auditable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Validates a seed URL and strips its fragment
///
/// # Rules
///
/// 1. Parse the URL; reject if malformed
/// 2. Only `http` and `https` are accepted
/// 3. A host is required
/// 4. The fragment is removed; everything else is kept as given
///
/// # Examples
///
/// ```
/// use site_audit::url::normalize_url;
///
/// let url = normalize_url("https://example.com/page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves an `href` against the page URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: schemes and data: URIs
/// - hrefs that do not resolve, or resolve to a non-HTTP(S) URL
///
/// The fragment of the resolved URL is dropped.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

/// Returns true if the URL path ends with one of the given extensions
pub fn is_asset_link(url: &Url, extensions: &[String]) -> bool {
    let path = url.path().to_ascii_lowercase();
    extensions.iter().any(|ext| {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        !ext.is_empty() && path.ends_with(&format!(".{}", ext))
    })
}
