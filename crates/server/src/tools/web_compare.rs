//! web_compare tool implementation.
//!
//! Fetches an old and a new page concurrently and reports which of the old
//! page's links survive on the new one.

use linkdiff_client::{Fetcher, compare_sites};
use linkdiff_core::AppConfig;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{extract_config, json_result, require};

/// Input parameters for web_compare tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebCompareParams {
    /// URL of the page on the old site.
    pub old_url: String,

    /// URL of the corresponding page on the new site.
    pub new_url: String,

    /// Compare links from the main content regions only (default: server config).
    #[serde(default)]
    pub content_links_only: Option<bool>,
}

/// Implementation of the web_compare tool.
pub async fn compare_impl(
    fetcher: &dyn Fetcher, config: &AppConfig, params: WebCompareParams,
) -> Result<CallToolResult, McpError> {
    let old_url = require("old_url", &params.old_url)?;
    let new_url = require("new_url", &params.new_url)?;
    let extract = extract_config(config, params.content_links_only, None);

    let comparison = compare_sites(fetcher, old_url, new_url, &extract).await?;
    json_result(&comparison)
}
