//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    /// The provisioning API answered with a non-success status
    #[error("HTTP error! status: {status} ({endpoint})")]
    ApiStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect, timeout, decode)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Call client error: {0}")]
    CallClient(String),
}

impl DomainError {
    pub fn api_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::ApiStatus {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_status_message_includes_status() {
        let err = DomainError::api_status("create-retell-llm", 500, "boom");
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 500 (create-retell-llm)"
        );
    }

    #[test]
    fn test_validation_message() {
        let err = DomainError::Validation("Unknown model: gpt-2".into());
        assert_eq!(err.to_string(), "Validation error: Unknown model: gpt-2");
    }
}
