//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-linkdiff server.

pub mod web_compare;
pub mod web_extract;
pub mod web_open;

use linkdiff_client::{ExtractConfig, LinkScope};
use linkdiff_core::{AppConfig, Error};
use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;

use crate::error::ServerError;

/// Pretty-printed JSON text content.
pub fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| ServerError::Serialization(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Reject blank required fields before any work starts.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingInput(format!("{field} is required")));
    }
    Ok(value)
}

/// Extraction settings from the server config with per-call overrides.
pub fn extract_config(
    config: &AppConfig, content_links_only: Option<bool>, include_images: Option<bool>,
) -> ExtractConfig {
    let mut extract = ExtractConfig::from(config);
    if let Some(content_only) = content_links_only {
        extract.link_scope = if content_only { LinkScope::Content } else { LinkScope::Page };
    }
    if let Some(include_images) = include_images {
        extract.include_images = include_images;
    }
    extract
}
