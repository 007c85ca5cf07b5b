//! Plain-text rendering of a page's visible content.
//!
//! The output is split into labelled sections, one per detected content
//! region (`main`, `article`, `section`, `role="main"`, `class="...content..."`),
//! falling back to the whole body. Links are kept inline as `[text](url)`.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::{self, NodeKind, PageTree};
use crate::extract::normalize::{Resolution, is_placeholder, normalize};

/// Label of the optional image listing.
pub const IMAGES_LABEL: &str = "images";

/// Blocks separated from their neighbours by a blank line.
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "ul", "ol", "dl", "figure", "form", "hr",
];

/// Blocks that only start a new line.
const LINE_TAGS: &[&str] = &[
    "li", "div", "section", "article", "main", "header", "footer", "nav", "aside", "tr", "figcaption", "dt", "dd",
];

const REGION_TAGS: &[&str] = &["main", "article", "section"];

/// A labelled chunk of rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Append an `images` section listing every image on the page.
    pub include_images: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Break {
    Line,
    Paragraph,
}

/// Accumulates rendered text for one section.
#[derive(Debug, Default)]
struct TextBuffer {
    text: String,
}

impl TextBuffer {
    /// Append the words of a text node, separated from what came before by one space.
    fn push_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if !self.text.is_empty() && !self.text.ends_with(char::is_whitespace) {
                self.text.push(' ');
            }
            self.text.push_str(word);
        }
    }

    fn push_break(&mut self, kind: Break) {
        if self.text.is_empty() {
            return;
        }
        let wanted = match kind {
            Break::Line => 1,
            Break::Paragraph => 2,
        };
        let present = self.text.len() - self.text.trim_end_matches('\n').len();
        for _ in present..wanted {
            self.text.push('\n');
        }
    }

    /// `<br>`: always a new line, so repeated breaks can open blank lines.
    fn push_newline(&mut self) {
        self.text.push('\n');
    }
}

/// Sections of a rendered page, with the elements the numbered ones came from.
#[derive(Debug)]
pub struct RenderedPage<'a> {
    /// One root per numbered section, in the same order.
    pub regions: Vec<ElementRef<'a>>,
    pub sections: Vec<ContentSection>,
}

/// Render a page into sections.
///
/// Regions that render to nothing are dropped. When none survive, the body
/// (or the document root) becomes the single section.
pub fn render_page<'a>(tree: &'a PageTree, base: &Url, options: &RenderOptions) -> RenderedPage<'a> {
    let (mut regions, mut texts): (Vec<ElementRef<'a>>, Vec<String>) = content_regions(tree)
        .into_iter()
        .map(|region| (region, render_element(region, base)))
        .filter(|(_, text)| !text.is_empty())
        .unzip();

    if texts.is_empty() {
        let body = tree.body().unwrap_or_else(|| tree.root());
        regions.push(body);
        texts.push(render_element(body, base));
    }

    let mut sections: Vec<ContentSection> = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ContentSection { label: format!("section {}", i + 1), text })
        .collect();

    if options.include_images
        && let Some(images) = render_images(tree, base)
    {
        sections.push(images);
    }

    RenderedPage { regions, sections }
}

/// Outermost content regions in document order.
fn content_regions(tree: &PageTree) -> Vec<ElementRef<'_>> {
    let mut regions = Vec::new();
    find_regions(tree.root(), &mut regions);
    regions
}

fn find_regions<'a>(element: ElementRef<'a>, regions: &mut Vec<ElementRef<'a>>) {
    if dom::is_non_rendered(element) {
        return;
    }
    if is_content_region(element) {
        regions.push(element);
        return;
    }
    for child in dom::child_nodes(element) {
        match child {
            NodeKind::Element(el) => find_regions(el, regions),
            NodeKind::Text(_) | NodeKind::Other => {}
        }
    }
}

fn is_content_region(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if REGION_TAGS.contains(&value.name()) {
        return true;
    }
    if let Some(role) = dom::attr(element, "role")
        && (role.eq_ignore_ascii_case("main") || role.eq_ignore_ascii_case("article"))
    {
        return true;
    }

    let id = value.id().into_iter();
    let classes = value.classes();
    id.chain(classes).any(|token| token.to_ascii_lowercase().contains("content"))
}

/// Render one subtree to tidy text.
pub fn render_element(element: ElementRef<'_>, base: &Url) -> String {
    let mut buffer = TextBuffer::default();
    render_into(element, base, &mut buffer);
    tidy(&buffer.text)
}

fn render_into(element: ElementRef<'_>, base: &Url, buffer: &mut TextBuffer) {
    if dom::is_non_rendered(element) {
        return;
    }

    let name = element.value().name();
    match name {
        "br" => buffer.push_newline(),
        "img" => {}
        "a" => render_link(element, base, buffer),
        _ => match block_break(name) {
            Some(kind) => {
                buffer.push_break(kind);
                render_children(element, base, buffer);
                buffer.push_break(kind);
            }
            None => render_children(element, base, buffer),
        },
    }
}

fn render_children(element: ElementRef<'_>, base: &Url, buffer: &mut TextBuffer) {
    for child in dom::child_nodes(element) {
        match child {
            NodeKind::Text(text) => buffer.push_text(text),
            NodeKind::Element(el) => render_into(el, base, buffer),
            NodeKind::Other => {}
        }
    }
}

/// `[text](url)` when both halves exist, otherwise just the text.
fn render_link(element: ElementRef<'_>, base: &Url, buffer: &mut TextBuffer) {
    let text = dom::visible_text(element);
    if text.is_empty() {
        return;
    }

    let target = dom::attr(element, "href")
        .filter(|href| !is_placeholder(href))
        .and_then(|href| match normalize(base, href) {
            Ok(Resolution::Link(url)) => Some(url),
            Ok(Resolution::NonNavigable) | Err(_) => None,
        });

    match target {
        Some(url) => buffer.push_text(&format!("[{text}]({url})")),
        None => buffer.push_text(&text),
    }
}

fn block_break(name: &str) -> Option<Break> {
    if PARAGRAPH_TAGS.contains(&name) {
        Some(Break::Paragraph)
    } else if LINE_TAGS.contains(&name) {
        Some(Break::Line)
    } else {
        None
    }
}

/// Collapse spaces within lines, collapse blank-line runs to one, trim.
fn tidy(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_blank = false;

    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(&line);
    }

    out
}

fn render_images(tree: &PageTree, base: &Url) -> Option<ContentSection> {
    let lines: Vec<String> = tree
        .find_elements(|el| el.value().name() == "img")
        .filter(|img| !img.ancestors().filter_map(ElementRef::wrap).any(dom::is_non_rendered))
        .filter_map(|img| image_line(img, base))
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(ContentSection { label: IMAGES_LABEL.to_string(), text: lines.join("\n") })
}

fn image_line(img: ElementRef<'_>, base: &Url) -> Option<String> {
    let Ok(Resolution::Link(url)) = normalize(base, dom::attr(img, "src")?) else {
        return None;
    };
    let description = dom::attr(img, "alt")
        .or_else(|| dom::attr(img, "title"))
        .unwrap_or("image");
    let size = match (dom::attr(img, "width"), dom::attr(img, "height")) {
        (Some(w), Some(h)) => format!(" ({w}x{h})"),
        _ => String::new(),
    };

    Some(format!("- {description}{size} {url}"))
}
