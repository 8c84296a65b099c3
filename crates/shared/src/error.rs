//! Error types for Breakwater

use thiserror::Error;

/// Error raised when the allow-list source cannot be read or parsed
#[derive(Debug, Error)]
#[error("Allow-list source '{source_name}' could not be loaded: {reason}")]
pub struct ListLoadError {
    pub source_name: String,
    pub reason: String,
}

/// Error raised when a rate limit is configured with an unusable value
#[derive(Debug, Error)]
#[error("Invalid rate limit for '{scope}': {reason}")]
pub struct LimitConfigError {
    pub scope: String,
    pub reason: String,
}

/// Error raised by an audit store when a row cannot be written
#[derive(Debug, Error)]
#[error("Audit store rejected the write: {reason}")]
pub struct StoreError {
    pub reason: String,
}

impl StoreError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Error raised when a reply to an actor cannot be delivered
#[derive(Debug, Error)]
#[error("Send to actor '{actor_id}' failed: {reason}")]
pub struct SendError {
    pub actor_id: String,
    pub reason: String,
}

impl SendError {
    pub fn new(actor_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            reason: reason.into(),
        }
    }
}

/// General Breakwater error type
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    ListLoad(#[from] ListLoadError),

    #[error(transparent)]
    LimitConfig(#[from] LimitConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ============== Error Message Tests ==============

    #[test]
    fn test_list_load_error_message() {
        let err = ListLoadError {
            source_name: "allowlist.txt".to_string(),
            reason: "permission denied".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("allowlist.txt"));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn test_limit_config_error_message() {
        let err = LimitConfigError {
            scope: "echo_message".to_string(),
            reason: "maxMessages must be at least 1".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("echo_message"));
        assert!(message.contains("at least 1"));
    }

    #[test]
    fn test_send_error_message() {
        let err = SendError::new("42", "connection reset");

        let message = err.to_string();
        assert!(message.contains("42"));
        assert!(message.contains("connection reset"));
    }

    // ============== Conversion Tests ==============

    #[test]
    fn test_gateway_error_from_list_load() {
        let err: GatewayError = ListLoadError {
            source_name: "list".to_string(),
            reason: "missing".to_string(),
        }
        .into();

        assert!(matches!(err, GatewayError::ListLoad(_)));
    }

    #[test]
    fn test_gateway_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: GatewayError = io.into();

        assert!(matches!(err, GatewayError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_gateway_error_transparent_message() {
        let err: GatewayError = StoreError::new("connection refused").into();

        // Transparent variants surface the inner message unchanged
        assert_eq!(err.to_string(), "Audit store rejected the write: connection refused");
    }
}
