//! Error types for catalog calls and the submission pipeline.

use thiserror::Error;

use crate::validation::FieldErrors;

/// Catalog service error.
///
/// Carries strings rather than the transport error so it can be cloned onto worker events.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer credential is available yet.
    #[error("not signed in")]
    MissingCredential,

    /// Request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Transport(String),

    /// Non-2xx response, with the server's `message` when it sent one.
    #[error("HTTP status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the server attached to a failed response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.is_empty() => Some(m),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Result type for catalog calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a submit attempt did not reach the network.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// A creation call for this form is already in flight.
    #[error("a submission is already in progress")]
    InFlight,

    /// No sub-category chosen yet; the save affordance is disabled.
    #[error("Please select a subcategory before saving.")]
    NoSubCategory,

    /// Nothing staged to upload.
    #[error("Please upload at least one product image")]
    NoImages,

    /// Required fields are missing.
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_only_for_status_with_text() {
        let e = ApiError::Status {
            status: 409,
            message: Some("Duplicate title".into()),
        };
        assert_eq!(e.server_message(), Some("Duplicate title"));

        let empty = ApiError::Status {
            status: 500,
            message: Some(String::new()),
        };
        assert_eq!(empty.server_message(), None);
        assert_eq!(ApiError::Transport("reset".into()).server_message(), None);
    }

    #[test]
    fn test_status_display() {
        let e = ApiError::Status {
            status: 404,
            message: None,
        };
        assert_eq!(e.to_string(), "HTTP status 404: no message");
    }
}
