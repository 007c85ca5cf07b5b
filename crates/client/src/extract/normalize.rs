//! Link reference resolution and canonicalization.
//!
//! Resolution rules, in order:
//! 1. `scheme://...` is already absolute
//! 2. `//host/...` takes the base URL's scheme
//! 3. `/path` is rooted at the base URL's origin
//! 4. anything else is also joined at the origin root, not at the current
//!    path segment (`img.png` on `/blog/post` resolves to `/img.png`)
//!
//! `mailto:`, `tel:`, `javascript:` and `data:` references are not
//! navigable and resolve to [`Resolution::NonNavigable`] rather than an
//! error. Canonical URLs never carry a fragment or a query string.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::url::has_scheme;

const NON_NAVIGABLE_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Whether a link stays on the page's host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOrigin {
    Internal,
    External,
}

/// Outcome of resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Link(Url),
    NonNavigable,
}

/// A single reference that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid reference {reference:?}: {reason}")]
pub struct InvalidReference {
    pub reference: String,
    pub reason: String,
}

impl InvalidReference {
    fn new(reference: &str, reason: impl Into<String>) -> Self {
        Self { reference: reference.to_string(), reason: reason.into() }
    }
}

/// Resolve `reference` against `base` and canonicalize the result.
pub fn normalize(base: &Url, reference: &str) -> Result<Resolution, InvalidReference> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(InvalidReference::new(reference, "empty reference"));
    }

    if is_non_navigable(reference) {
        return Ok(Resolution::NonNavigable);
    }

    let resolved = if has_scheme(reference) {
        Url::parse(reference)
    } else if reference.starts_with("//") {
        Url::parse(&format!("{}:{}", base.scheme(), reference))
    } else if reference.starts_with('/') {
        base.join(reference)
    } else {
        base.join(&format!("/{reference}"))
    };

    let url = resolved.map_err(|e| InvalidReference::new(reference, e.to_string()))?;
    Ok(Resolution::Link(canonicalize(url)))
}

/// Strip the fragment and query string.
pub fn canonicalize(mut url: Url) -> Url {
    url.set_fragment(None);
    url.set_query(None);
    url
}

/// `Internal` iff the hosts are exactly equal; scheme and path are ignored.
pub fn classify(url: &Url, base: &Url) -> LinkOrigin {
    if url.host_str() == base.host_str() { LinkOrigin::Internal } else { LinkOrigin::External }
}

/// References that stand for "no target": blank or the bare `#` placeholder.
pub fn is_placeholder(reference: &str) -> bool {
    let reference = reference.trim();
    reference.is_empty() || reference == "#"
}

fn is_non_navigable(reference: &str) -> bool {
    NON_NAVIGABLE_SCHEMES.iter().any(|scheme| {
        reference
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://site.com/p").unwrap()
    }

    fn link(reference: &str) -> String {
        match normalize(&base(), reference).unwrap() {
            Resolution::Link(url) => url.to_string(),
            Resolution::NonNavigable => panic!("{reference} should be navigable"),
        }
    }

    #[test]
    fn test_absolute_reference() {
        assert_eq!(link("https://other.org/a/b"), "https://other.org/a/b");
        assert_eq!(link("HTTP://Other.org"), "http://other.org/");
    }

    #[test]
    fn test_scheme_relative_reference() {
        let url = link("//cdn.example.com/a.js");
        assert_eq!(url, "https://cdn.example.com/a.js");
        assert_eq!(classify(&Url::parse(&url).unwrap(), &base()), LinkOrigin::External);

        let http_base = Url::parse("http://site.com/").unwrap();
        let Resolution::Link(url) = normalize(&http_base, "//cdn.example.com/a.js").unwrap() else {
            panic!("expected link");
        };
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_rooted_reference_keeps_origin_port() {
        let base = Url::parse("http://localhost:8080/docs/intro").unwrap();
        let Resolution::Link(url) = normalize(&base, "/about").unwrap() else {
            panic!("expected link");
        };
        assert_eq!(url.as_str(), "http://localhost:8080/about");
    }

    #[test]
    fn test_bare_relative_reference_joins_origin_root() {
        let base = Url::parse("https://site.com/blog/post").unwrap();
        let Resolution::Link(url) = normalize(&base, "img.png").unwrap() else {
            panic!("expected link");
        };
        assert_eq!(url.as_str(), "https://site.com/img.png");
    }

    #[test]
    fn test_standard_relative_resolution_differs() {
        // What a browser would do with the same reference; kept alongside the
        // root-relative case above so the difference stays visible.
        let base = Url::parse("https://site.com/blog/post").unwrap();
        assert_eq!(base.join("img.png").unwrap().as_str(), "https://site.com/blog/img.png");
    }

    #[test]
    fn test_fragment_and_query_stripped() {
        assert_eq!(link("/docs?utm_source=mail#install"), "https://site.com/docs");
        assert_eq!(link("https://site.com/docs#faq"), "https://site.com/docs");
        assert_eq!(link("#section"), "https://site.com/");

        for reference in ["?q=1", "/a?b=c&d=e", "//x.org/?y#z", "page#top", "https://e.com/p?x#y"] {
            let url = link(reference);
            assert!(!url.contains('#'), "{url}");
            assert!(!url.contains('?'), "{url}");
        }
    }

    #[test]
    fn test_non_navigable_references() {
        for reference in ["mailto:info@site.com", "tel:+15551234", "MAILTO:x@y.z", "javascript:void(0)", "data:,hi"]
        {
            assert_eq!(normalize(&base(), reference), Ok(Resolution::NonNavigable), "{reference}");
        }
    }

    #[test]
    fn test_invalid_references() {
        assert!(normalize(&base(), "   ").is_err());
        assert!(normalize(&base(), "http://exa mple.com/").is_err());

        let err = normalize(&base(), "https://").unwrap_err();
        assert_eq!(err.reference, "https://");
    }

    #[test]
    fn test_classify_by_exact_host() {
        let base = Url::parse("https://site.com/p").unwrap();

        let same_host_other_path = Url::parse("https://site.com/deep/path").unwrap();
        let same_host_other_scheme = Url::parse("http://site.com/p").unwrap();
        let subdomain = Url::parse("https://www.site.com/p").unwrap();
        let other = Url::parse("https://other.com/p").unwrap();

        assert_eq!(classify(&same_host_other_path, &base), LinkOrigin::Internal);
        assert_eq!(classify(&same_host_other_scheme, &base), LinkOrigin::Internal);
        assert_eq!(classify(&subdomain, &base), LinkOrigin::External);
        assert_eq!(classify(&other, &base), LinkOrigin::External);
    }

    #[test]
    fn test_is_placeholder() {
        assert!(is_placeholder(""));
        assert!(is_placeholder(" # "));
        assert!(!is_placeholder("#top"));
        assert!(!is_placeholder("/"));
    }
}
