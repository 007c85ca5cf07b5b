//! Errors raised by the server layer itself.
//!
//! Pipeline failures already carry their own mapping in
//! `linkdiff_core::Error`; this covers what happens after a tool has a result.

use rmcp::model::{ErrorCode, ErrorData as McpError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A tool result could not be encoded as JSON.
    #[error("SERIALIZATION_FAILED: {0}")]
    Serialization(String),
}

impl From<ServerError> for McpError {
    fn from(err: ServerError) -> Self {
        let (code, message) = match &err {
            ServerError::Serialization(msg) => (-32603, format!("failed to encode result: {msg}")),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error_maps_to_internal_error() {
        let err: McpError = ServerError::Serialization("key must be a string".into()).into();
        assert_eq!(err.code, ErrorCode(-32603));
        assert!(err.message.contains("key must be a string"));
        assert!(err.data.is_none());
    }
}
