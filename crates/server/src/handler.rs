//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use linkdiff_client::Fetcher;
use linkdiff_core::AppConfig;

use crate::tools::web_compare::{WebCompareParams, compare_impl};
use crate::tools::web_extract::{WebExtractParams, extract_impl};
use crate::tools::web_open::{WebOpenParams, open_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-linkdiff.
#[derive(Clone)]
pub struct LinkDiffServer {
    tool_router: ToolRouter<Self>,
    config: Arc<AppConfig>,
    fetcher: Arc<dyn Fetcher>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl LinkDiffServer {
    /// Create a new server handler sharing one fetcher across all tool calls.
    pub fn new(config: AppConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { tool_router: Self::tool_router(), config: Arc::new(config), fetcher }
    }

    /// Extract links and content from supplied HTML. No network requests are made.
    #[tool(
        description = "Extract the link inventory and plain-text content of an HTML document. Relative links resolve against `url`. No network access."
    )]
    async fn web_extract(&self, params: Parameters<WebExtractParams>) -> Result<CallToolResult, McpError> {
        extract_impl(&self.config, params.0).await
    }

    /// Fetch a page and extract its links and content.
    #[tool(
        description = "Fetch a web page and return its title, deduplicated internal/external links, sectioned plain-text content and word count."
    )]
    async fn web_open(&self, params: Parameters<WebOpenParams>) -> Result<CallToolResult, McpError> {
        open_impl(self.fetcher.as_ref(), &self.config, params.0).await
    }

    /// Compare the links of an old page and its replacement.
    #[tool(
        description = "Fetch an old and a new page and report which old links are shared or missing on the new page, with a similarity percentage."
    )]
    async fn web_compare(&self, params: Parameters<WebCompareParams>) -> Result<CallToolResult, McpError> {
        compare_impl(self.fetcher.as_ref(), &self.config, params.0).await
    }
}

impl ServerHandler for LinkDiffServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-linkdiff".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::StaticFetcher;

    #[test]
    fn test_lists_all_tools() {
        let server = LinkDiffServer::new(AppConfig::default(), Arc::new(StaticFetcher::default()));
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["web_compare", "web_extract", "web_open"]);
    }

    #[test]
    fn test_server_info() {
        let server = LinkDiffServer::new(AppConfig::default(), Arc::new(StaticFetcher::default()));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "mcp-linkdiff");
        assert!(info.capabilities.tools.is_some());
    }
}
