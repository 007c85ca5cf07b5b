//! Link inventory of a parsed page.
//!
//! Walks the tree in pre-order and records one [`LinkRecord`] per canonical
//! URL. Anchors are always collected; images, buttons and `data-*` link
//! attributes are opt-in through [`LinkSources`]. The first element to
//! produce a URL decides its anchor text and follow status.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use super::normalize::{LinkOrigin, Resolution, classify, is_placeholder, normalize};
use crate::dom::{self, NodeKind, PageTree};

/// Attributes that declare a link on arbitrary elements.
pub const DATA_LINK_ATTRS: &[&str] = &["data-href", "data-url", "data-link"];

/// A collected link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Canonical URL, never carrying a query or fragment
    pub url: String,
    pub anchor_text: String,
    pub origin: LinkOrigin,
    /// False only when `rel` contains `nofollow`
    pub followable: bool,
}

/// Optional link sources beyond anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSources {
    pub images: bool,
    pub buttons: bool,
    pub data_attributes: bool,
}

/// A raw reference found on an element, before normalization.
struct Candidate<'a> {
    reference: &'a str,
    text: String,
    followable: bool,
}

/// Collect links from the whole document.
pub fn collect_links(tree: &PageTree, base: &Url, sources: LinkSources) -> Vec<LinkRecord> {
    collect_links_within(&[tree.root()], base, sources)
}

/// Collect links from several subtrees, deduplicated across all of them.
pub fn collect_links_within(roots: &[ElementRef<'_>], base: &Url, sources: LinkSources) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for root in roots {
        walk(*root, base, sources, &mut seen, &mut links);
    }
    links
}

fn walk(
    element: ElementRef<'_>, base: &Url, sources: LinkSources, seen: &mut HashSet<String>, links: &mut Vec<LinkRecord>,
) {
    if let Some(candidate) = candidate(element, sources) {
        record(candidate, base, seen, links);
    }

    for child in dom::child_nodes(element) {
        match child {
            NodeKind::Element(el) => walk(el, base, sources, seen, links),
            NodeKind::Text(_) | NodeKind::Other => {}
        }
    }
}

fn record(candidate: Candidate<'_>, base: &Url, seen: &mut HashSet<String>, links: &mut Vec<LinkRecord>) {
    let url = match normalize(base, candidate.reference) {
        Ok(Resolution::Link(url)) => url,
        Ok(Resolution::NonNavigable) => return,
        Err(e) => {
            tracing::debug!(reference = %e.reference, reason = %e.reason, "skipping link");
            return;
        }
    };

    let key = url.to_string();
    if !seen.insert(key.clone()) {
        return;
    }

    let anchor_text = if candidate.text.is_empty() { key.clone() } else { candidate.text };
    links.push(LinkRecord {
        url: key,
        anchor_text,
        origin: classify(&url, base),
        followable: candidate.followable,
    });
}

/// The link an element declares, if any. Each element yields at most one.
/// Anchors read only their visible text; the empty case falls back to the URL.
fn candidate<'a>(element: ElementRef<'a>, sources: LinkSources) -> Option<Candidate<'a>> {
    let name = element.value().name();
    let followable = is_followable(element);

    let (reference, text) = match name {
        "a" => (dom::attr(element, "href")?, dom::visible_text(element)),
        "area" => (dom::attr(element, "href")?, fallback_text(element, &["alt", "title"])),
        "button" if sources.buttons => {
            let reference = dom::attr(element, "formaction").or_else(|| dom::attr(element, "data-href"))?;
            (reference, text_or(element, &["title", "aria-label"]))
        }
        "img" if sources.images => (dom::attr(element, "src")?, fallback_text(element, &["alt", "title"])),
        _ if sources.data_attributes => {
            let reference = DATA_LINK_ATTRS.iter().find_map(|attr| dom::attr(element, attr))?;
            (reference, text_or(element, &["title"]))
        }
        _ => return None,
    };

    if is_placeholder(reference) {
        return None;
    }

    Some(Candidate { reference, text, followable })
}

/// Visible text, falling back to the first non-blank attribute.
fn text_or(element: ElementRef<'_>, fallbacks: &[&str]) -> String {
    let text = dom::visible_text(element);
    if text.is_empty() { fallback_text(element, fallbacks) } else { text }
}

fn fallback_text(element: ElementRef<'_>, attrs: &[&str]) -> String {
    attrs
        .iter()
        .find_map(|attr| dom::attr(element, attr))
        .map(|value| value.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// `rel` tokens are matched exactly, so `NoFollow` still counts as followable.
fn is_followable(element: ElementRef<'_>) -> bool {
    !element
        .value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|token| token == "nofollow"))
}
