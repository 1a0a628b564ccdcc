//! Error types for the Luno API client.
//!
//! # Design
//! Status codes the caller commonly branches on get dedicated variants:
//! 404 is `NotFound`, 400/409/422 are `Validation`, 401/403 are `Auth`.
//! Every other non-2xx response lands in `Http` with the raw status code and
//! body. `InvalidArgument` is raised locally, before any request leaves the
//! client.

use serde::Deserialize;

/// Convenience alias used by every client method.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the Luno client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required entity reference was `None`, or an id was empty.
    #[error("invalid argument: `{name}` is required")]
    InvalidArgument { name: &'static str },

    /// The server returned 404: the requested resource does not exist.
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// The server rejected the payload shape or a business rule.
    #[error("validation failed ({status}): {message}")]
    Validation { status: u16, message: String },

    /// The credentials were missing, invalid, or lack permission.
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned some other non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The client configuration is missing a value or holds an invalid one.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Error body shape returned by the API, e.g.
/// `{"code": "user_not_found", "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Map a non-success status and its body to the matching variant.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            404 => ApiError::NotFound { message },
            400 | 409 | 422 => ApiError::Validation { status, message },
            401 | 403 => ApiError::Auth { status, message },
            _ => ApiError::Http {
                status,
                body: body.to_string(),
            },
        }
    }

    /// Whether the error was raised by the server rather than locally.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound { .. }
                | ApiError::Validation { .. }
                | ApiError::Auth { .. }
                | ApiError::Http { .. }
        )
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            code: Some(code), ..
        }) => code,
        _ => body.to_string(),
    }
}
