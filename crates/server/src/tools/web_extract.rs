//! web_extract tool implementation.
//!
//! Extracts links and rendered content from HTML supplied by the client.
//! No network I/O is performed.

use linkdiff_client::extract_page;
use linkdiff_client::fetch::parse_page_url;
use linkdiff_client::extract::ExtractionResult;
use linkdiff_core::AppConfig;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{extract_config, json_result, require};

/// Input parameters for web_extract tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebExtractParams {
    /// The raw HTML content to extract from.
    pub html: String,

    /// The page's URL; relative links are resolved against it.
    pub url: String,

    /// Collect links from the main content regions only.
    #[serde(default)]
    pub content_links_only: Option<bool>,

    /// Append an "images" section listing the page's images.
    #[serde(default)]
    pub include_images: Option<bool>,
}

/// Output structure for web_extract tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebExtractOutput {
    /// The page URL links were resolved against.
    pub url: String,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

/// Implementation of the web_extract tool.
pub async fn extract_impl(config: &AppConfig, params: WebExtractParams) -> Result<CallToolResult, McpError> {
    let html = require("html", &params.html)?;
    let url = parse_page_url(require("url", &params.url)?).map_err(linkdiff_core::Error::from)?;

    let extract = extract_config(config, params.content_links_only, params.include_images);
    let result = extract_page(html, &url, &extract)?;

    tracing::debug!(url = %url, links = result.links.len(), words = result.word_count, "extracted supplied html");

    json_result(&WebExtractOutput { url: url.to_string(), result })
}
