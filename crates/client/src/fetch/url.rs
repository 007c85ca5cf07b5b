//! Validation of page URLs supplied by callers.
//!
//! This is the entry gate for a page pipeline, distinct from link
//! normalization: the query string is kept because it can select the page.

use url::Url;

/// Error type for page URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for linkdiff_core::Error {
    fn from(err: UrlError) -> Self {
        match err {
            UrlError::Empty => linkdiff_core::Error::MissingInput("url must not be empty".into()),
            other => linkdiff_core::Error::InvalidUrl(other.to_string()),
        }
    }
}

/// Parse a caller-supplied page URL.
///
/// 1. Trim surrounding whitespace; blank input is [`UrlError::Empty`]
/// 2. Default the scheme to `https://` when none is given
/// 3. Accept only `http` and `https` with a host
/// 4. Lowercase the host and drop the fragment
pub fn parse_page_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if has_scheme(trimmed) { trimmed.to_string() } else { format!("https://{trimmed}") };
    let mut parsed = Url::parse(&candidate).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return Err(UrlError::MissingHost(trimmed.to_string())),
    };
    parsed
        .set_host(Some(&host))
        .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Whether `input` starts with `scheme://` for a syntactically valid scheme (RFC 3986 section 3.1).
///
/// A `://` later in the string, e.g. inside a query parameter, does not count.
pub fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_url_defaults_scheme() {
        let url = parse_page_url("old.example.com/about").unwrap();
        assert_eq!(url.as_str(), "https://old.example.com/about");
    }

    #[test]
    fn test_parse_page_url_scheme_only_in_query() {
        let url = parse_page_url("site.com/go?to=https://x.org/").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("site.com"));
        assert_eq!(url.query(), Some("to=https://x.org/"));
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://a.b"));
        assert!(has_scheme("git+ssh://host/repo"));
        assert!(!has_scheme("/redirect?to=https://a.b"));
        assert!(!has_scheme("site.com/go?to=https://x"));
        assert!(!has_scheme("1http://a.b"));
        assert!(!has_scheme("plain/path"));
    }

    #[test]
    fn test_parse_page_url_keeps_query_drops_fragment() {
        let url = parse_page_url("  https://Example.COM/list?page=2#top ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.query(), Some("page=2"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_parse_page_url_blank_is_missing_input() {
        assert!(matches!(parse_page_url("   "), Err(UrlError::Empty)));

        let err: linkdiff_core::Error = parse_page_url("").unwrap_err().into();
        assert!(matches!(err, linkdiff_core::Error::MissingInput(_)));
    }

    #[test]
    fn test_parse_page_url_rejects_other_schemes() {
        let result = parse_page_url("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(s)) if s == "file"));

        let err: linkdiff_core::Error = parse_page_url("ftp://files.example.com").unwrap_err().into();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_parse_page_url_invalid() {
        assert!(matches!(parse_page_url("https://exa mple.com"), Err(UrlError::InvalidUrl(_))));
    }
}
