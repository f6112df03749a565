use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// The API answered with a non-2xx status.
    #[error("Unexpected status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Human-readable text for the dashboard. Messages supplied by the API
    /// are used verbatim, otherwise `fallback` is returned.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RepositoryError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            RepositoryError::Network(_) => "Network error".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Status {
                status: status.as_u16(),
                message: None,
            }
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_message_is_surfaced_verbatim() {
        let err = RepositoryError::Status {
            status: 400,
            message: Some("Contact is locked".to_string()),
        };
        assert_eq!(err.user_message("Failed to update contact"), "Contact is locked");
    }

    #[test]
    fn missing_message_uses_fallback() {
        let err = RepositoryError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to fetch contacts"), "Failed to fetch contacts");
        assert_eq!(
            RepositoryError::Decode("eof".to_string()).user_message("Failed to fetch contacts"),
            "Failed to fetch contacts"
        );
    }

    #[test]
    fn network_failures_read_as_network_error() {
        let err = RepositoryError::Network("connection refused".to_string());
        assert_eq!(err.user_message("Failed to fetch contacts"), "Network error");
    }
}
