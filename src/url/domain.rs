use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs share host and explicit port
///
/// The scheme is ignored, so `http://host/` and `https://host/` are the same
/// site. Default ports are dropped by the parser and compare as absent.
pub fn same_site(a: &Url, b: &Url) -> bool {
    extract_domain(a).is_some() && extract_domain(a) == extract_domain(b) && a.port() == b.port()
}

/// `scheme://host[:port]` of a URL, the base for well-known resources
///
/// ```
/// use url::Url;
/// use site_audit::url::site_origin;
///
/// let url = Url::parse("https://example.com/a/b?c").unwrap();
/// assert_eq!(site_origin(&url), "https://example.com");
/// ```
pub fn site_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}
