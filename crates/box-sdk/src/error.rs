//! Error types for the Box SDK.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoxError {
    /// The Box API answered with a non-2xx status code.
    #[error("Box API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A Box timestamp could not be parsed.
    #[error("Date error: {0}")]
    Date(#[from] chrono::ParseError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A 2xx response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, BoxError>;

/// Error body returned by the Box API, e.g.
/// `{"type": "error", "status": 404, "code": "not_found", "message": "...", "request_id": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
}

impl BoxError {
    pub(crate) fn from_response_body(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
        let (code, message, request_id) = match parsed {
            Some(b) => (b.code, b.message, b.request_id),
            None => (None, None, None),
        };
        BoxError::Api {
            status: status.as_u16(),
            code,
            message: message.unwrap_or_else(|| status.to_string()),
            request_id,
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BoxError::Api { status, .. } => Some(*status),
            BoxError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
