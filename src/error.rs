//! Error types for the resource client.

use thiserror::Error;

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors raised while building, sending or decoding a resource invocation.
///
/// A server that answers `{ "ok": false, ... }` is *not* an error: that reply
/// decodes into [`crate::protocol::InvokeResponse::Failure`] and is returned
/// normally. Only structural problems on our side and transport failures end
/// up here.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource subtype is not one this client knows how to build.
    #[error("Unsupported resource subtype: {subtype}")]
    UnsupportedSubtype { subtype: String },

    /// The operation is not declared for the resource subtype.
    #[error("Unsupported operation '{operation}' for resource subtype {subtype}")]
    UnsupportedOperation { subtype: String, operation: String },

    /// A payload was handed to a client bound to a different resource kind.
    #[error("payload targets {actual} but the client is bound to {expected}")]
    KindMismatch { expected: String, actual: String },

    /// Client configuration could not be used.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The call never produced a decodable envelope (network failure,
    /// non-JSON body, header provider failure, ...).
    #[error("{0}")]
    Invoke(String),

    /// A wire payload could not be decoded into a known shape.
    #[error("failed to decode payload: {0}")]
    Decode(String),
}

impl ResourceError {
    /// Wrap a transport-level failure, keeping the full cause chain in the message.
    pub fn invoke(cause: &anyhow::Error) -> Self {
        Self::Invoke(format!("Failed to invoke resource: {:#}", cause))
    }

    /// True for failures that happened on the way to or from the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Invoke(_))
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_error_keeps_cause_chain() {
        let cause = anyhow::anyhow!("dns error: no such host").context("Failed to send request");
        let err = ResourceError::invoke(&cause);

        let message = err.to_string();
        assert!(message.starts_with("Failed to invoke resource: "));
        assert!(message.contains("no such host"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_unsupported_subtype_message() {
        let err = ResourceError::UnsupportedSubtype {
            subtype: "not-a-real-kind".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported resource subtype: not-a-real-kind");
        assert!(!err.is_transport());
    }
}
