//! Unified error types for linkdiff.
//!
//! Per-link resolution problems never reach this type; they are absorbed
//! by the link collector. Everything here aborts a single page pipeline
//! (and with it any comparison that depends on that page).

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input (e.g. a page URL) was absent or blank.
    #[error("MISSING_INPUT: {0}")]
    MissingInput(String),

    /// A page URL was supplied but could not be used.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network, timeout, size limit, blocked host, or non-success response.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// The markup could not be turned into a document tree.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than an upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MissingInput(_) | Error::InvalidUrl(_))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::MissingInput(msg) => (-32602, format!("missing input: {msg}")),
            Error::InvalidUrl(msg) => (-32602, format!("invalid url: {msg}")),
            Error::FetchFailed(msg) => (-32001, format!("failed to fetch page: {msg}")),
            Error::ParseFailed(msg) => (-32002, format!("failed to parse page: {msg}")),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
