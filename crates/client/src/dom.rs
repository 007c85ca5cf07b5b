//! Parsed document tree.
//!
//! Wraps the `scraper` HTML5 parser. The tree is an index-addressed arena
//! (`ego_tree`), read-only after parsing, so every traversal in this crate
//! is a plain depth-first walk over immutable element handles.

use scraper::{ElementRef, Html, Node};

use linkdiff_core::Error;

/// Elements whose subtree never contributes rendered text.
pub const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Errors from the parse step.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomError {
    #[error("empty document")]
    Empty,

    #[error("document is binary, not markup")]
    Binary,
}

impl From<DomError> for Error {
    fn from(err: DomError) -> Self {
        Error::ParseFailed(err.to_string())
    }
}

/// A node as seen by the renderer and the link collector.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    /// Comments, doctypes and processing instructions.
    Other,
}

/// A parsed page.
pub struct PageTree {
    html: Html,
}

impl PageTree {
    /// Parse raw markup.
    ///
    /// The HTML5 algorithm recovers from malformed markup, so only input
    /// with nothing to parse (blank, or binary content) is rejected.
    pub fn parse(markup: &str) -> Result<Self, DomError> {
        if markup.trim().is_empty() {
            return Err(DomError::Empty);
        }
        if markup.contains('\0') {
            return Err(DomError::Binary);
        }

        Ok(Self { html: Html::parse_document(markup) })
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.first_element("body")
    }

    /// First element with the given tag name in document order.
    pub fn first_element(&self, tag: &str) -> Option<ElementRef<'_>> {
        self.root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == tag)
    }

    /// All elements matching `predicate`, in document order.
    pub fn find_elements<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = ElementRef<'a>> + 'a
    where
        P: Fn(&ElementRef<'a>) -> bool + 'a,
    {
        self.root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| predicate(el))
    }
}

/// Direct children of an element. The only place node types are inspected.
pub fn child_nodes<'a>(element: ElementRef<'a>) -> impl Iterator<Item = NodeKind<'a>> + 'a {
    element.children().map(|child| match child.value() {
        Node::Text(text) => NodeKind::Text(&**text),
        Node::Element(_) => ElementRef::wrap(child).map_or(NodeKind::Other, NodeKind::Element),
        _ => NodeKind::Other,
    })
}

pub fn is_non_rendered(element: ElementRef<'_>) -> bool {
    NON_RENDERED.contains(&element.value().name())
}

/// Whitespace-collapsed text of an element's rendered subtree.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut words = Vec::new();
    collect_words(element, &mut words);
    words.join(" ")
}

fn collect_words<'a>(element: ElementRef<'a>, words: &mut Vec<&'a str>) {
    if is_non_rendered(element) {
        return;
    }
    for child in child_nodes(element) {
        match child {
            NodeKind::Text(text) => words.extend(text.split_whitespace()),
            NodeKind::Element(el) => collect_words(el, words),
            NodeKind::Other => {}
        }
    }
}

/// Non-blank attribute value, trimmed.
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
