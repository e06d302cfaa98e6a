use thiserror::Error;
use url::Url;

/// Link value used by entries whose real action is a snippet.
pub const LINK_PLACEHOLDER: &str = "#";

/// Errors raised when a URL cannot be used as the package index.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates the package index endpoint.
///
/// Unlike menu links, loopback hosts are accepted here: a local mirror of the
/// index is a legitimate deployment.
///
/// # Examples
///
/// ```
/// use tapmenu::util::validate_index_url;
///
/// assert!(validate_index_url("https://pypi.python.org/pypi/trustedanalytics/json").is_ok());
/// assert!(validate_index_url("http://127.0.0.1:8080/json").is_ok());
/// assert!(validate_index_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_index_url(url_str: &str) -> Result<Url, LinkError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// True for values that mean "no link": empty, or the `#` placeholder.
pub fn is_placeholder(href: &str) -> bool {
    let trimmed = href.trim();
    trimmed.is_empty() || trimmed == LINK_PLACEHOLDER
}

/// Returns the parsed URL when `href` should open in a new tab.
///
/// Placeholders, relative fragments and non-http(s) schemes yield `None` and
/// render as inert text.
pub fn external_link(href: &str) -> Option<Url> {
    if is_placeholder(href) {
        return None;
    }
    let url = Url::parse(href.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder("#"));
        assert!(is_placeholder(" # "));
        assert!(is_placeholder(""));
        assert!(!is_placeholder("https://example.com"));
    }

    #[test]
    fn test_external_links() {
        assert!(external_link("https://github.com/trustedanalytics/atk").is_some());
        assert!(external_link("http://trustedanalytics.org/").is_some());
        assert!(external_link("#").is_none());
        assert!(external_link("#section").is_none());
        assert!(external_link("javascript:alert(1)").is_none());
        assert!(external_link("mailto:someone@example.com").is_none());
    }

    #[test]
    fn test_index_url_schemes() {
        assert!(validate_index_url("https://pypi.org/pypi/trustedanalytics/json").is_ok());
        assert!(matches!(
            validate_index_url("ftp://example.com/json"),
            Err(LinkError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_index_url("not a url"),
            Err(LinkError::InvalidUrl(_))
        ));
    }
}
