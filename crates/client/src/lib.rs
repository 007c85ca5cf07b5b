//! Link extraction and comparison engine for linkdiff.
//!
//! This crate provides the page fetch pipeline, the parsed document tree,
//! link collection, text rendering and the old/new link comparison used by
//! the server.

pub mod compare;
pub mod dom;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod render;

pub use compare::{ComparisonResult, compare, compare_links};
pub use dom::{DomError, PageTree};
pub use extract::{
    DomExtractor, ExtractConfig, ExtractionResult, Extractor, LinkOrigin, LinkRecord, LinkScope, LinkSources,
    extract_page,
};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher};
pub use pipeline::{PageLinks, PageReport, SiteComparison, compare_sites, open_page};
pub use render::{ContentSection, RenderOptions};
