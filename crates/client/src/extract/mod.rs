//! Page extraction.
//!
//! Builds one [`PageTree`] from raw markup and derives everything the
//! service reports about a page from it:
//!
//! ### Title
//! - First `<title>`, else first `<h1>`, whitespace-collapsed.
//! - Falls back to [`NO_TITLE`]; a missing title never fails extraction.
//!
//! ### Links
//! - [`links::collect_links`] over the whole document, or over the
//!   regions behind the numbered sections only when [`LinkScope::Content`]
//!   is requested.
//!
//! ### Content
//! - [`render::render_page`](crate::render::render_page), then a
//!   word count over the assembled sections.

pub mod links;
pub mod normalize;

pub use links::{LinkRecord, LinkSources, collect_links, collect_links_within};
pub use normalize::{InvalidReference, LinkOrigin, Resolution, classify, normalize};

use linkdiff_core::{AppConfig, Error};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::{self, PageTree};
use crate::render::{self, ContentSection, RenderOptions};

/// Title used when a page has neither `<title>` nor `<h1>`.
pub const NO_TITLE: &str = "No title found";

/// Which part of the document links are collected from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkScope {
    #[default]
    Page,
    /// Only the regions that make up the rendered sections.
    Content,
}

/// Configuration for page extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractConfig {
    pub link_scope: LinkScope,
    pub link_sources: LinkSources,
    pub include_images: bool,
}

impl From<&AppConfig> for ExtractConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            link_scope: if config.content_links_only { LinkScope::Content } else { LinkScope::Page },
            link_sources: LinkSources {
                images: config.collect_image_links,
                buttons: config.collect_button_links,
                data_attributes: config.collect_data_links,
            },
            include_images: config.include_images,
        }
    }
}

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    pub sections: Vec<ContentSection>,
    /// Unique by URL, in document order
    pub links: Vec<LinkRecord>,
    pub word_count: usize,
}

/// Extraction engine behind the tools.
pub trait Extractor: Send + Sync {
    fn extract(&self, markup: &str, page_url: &Url, config: &ExtractConfig) -> Result<ExtractionResult, Error>;
}

/// Extractor over the `scraper` DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomExtractor;

impl Extractor for DomExtractor {
    fn extract(&self, markup: &str, page_url: &Url, config: &ExtractConfig) -> Result<ExtractionResult, Error> {
        let tree = PageTree::parse(markup)?;

        let title = extract_title(&tree);
        let options = RenderOptions { include_images: config.include_images };
        let rendered = render::render_page(&tree, page_url, &options);
        let links = match config.link_scope {
            LinkScope::Page => collect_links(&tree, page_url, config.link_sources),
            LinkScope::Content => collect_links_within(&rendered.regions, page_url, config.link_sources),
        };
        let sections = rendered.sections;
        let word_count = count_words(&sections);

        Ok(ExtractionResult { title, sections, links, word_count })
    }
}

/// Extract a page with the default extractor.
pub fn extract_page(markup: &str, page_url: &Url, config: &ExtractConfig) -> Result<ExtractionResult, Error> {
    DomExtractor.extract(markup, page_url, config)
}

fn extract_title(tree: &PageTree) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|tag| tree.first_element(tag))
        .map(dom::visible_text)
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn count_words(sections: &[ContentSection]) -> usize {
    sections
        .iter()
        .map(|section| section.text.split_whitespace().count())
        .sum()
}
