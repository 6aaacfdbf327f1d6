//! Error types for the records API client.
//!
//! # Design
//! `Network` covers every failure where no HTTP response came back at all;
//! the remaining variants mean the server answered. `NotFound` gets a
//! dedicated variant because callers frequently distinguish "the record does
//! not exist" from "the server returned an unexpected status." All other
//! non-2xx responses land in `HttpError` with the raw status code and body.

use serde::Deserialize;

/// Errors returned by the records client, transport and API layers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The server returned 404: the record does not exist or was soft-deleted.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// JSON error body the backend sends with failed requests.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// The `message` field of a JSON error body, when the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            ApiError::NotFound { body } | ApiError::HttpError { body, .. } => body,
            _ => return None,
        };
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
    }
}
