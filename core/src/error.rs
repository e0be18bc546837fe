//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the todo does not exist" from "the server returned an unexpected status".
//! It carries the server's `detail` message when one was sent. All other
//! unexpected responses land in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("not found: {detail}")]
    NotFound { detail: String },

    /// The server returned a status other than the expected one or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
