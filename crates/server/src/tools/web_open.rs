//! web_open tool implementation.
//!
//! Fetches a URL and extracts its links and content using the full fetch pipeline.

use linkdiff_client::{Fetcher, open_page};
use linkdiff_core::AppConfig;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{extract_config, json_result, require};

/// Input parameters for web_open tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebOpenParams {
    /// The URL to fetch. A missing scheme defaults to https.
    pub url: String,

    /// Collect links from the main content regions only (default: server config).
    #[serde(default)]
    pub content_links_only: Option<bool>,

    /// Append an "images" section listing the page's images (default: server config).
    #[serde(default)]
    pub include_images: Option<bool>,
}

/// Implementation of the web_open tool.
pub async fn open_impl(
    fetcher: &dyn Fetcher, config: &AppConfig, params: WebOpenParams,
) -> Result<CallToolResult, McpError> {
    let url = require("url", &params.url)?;
    let extract = extract_config(config, params.content_links_only, params.include_images);

    let report = open_page(fetcher, url, &extract).await?;
    json_result(&report)
}
