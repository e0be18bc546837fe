//! Wire DTOs for the todo API.
//!
//! # Design
//! Defined independently of the server crate so the client carries no
//! database or Axum dependencies. The live-server integration test catches
//! any drift between the two.

use serde::{Deserialize, Serialize};

/// A persisted todo as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub content: String,
}

/// Request payload for both create and update. The server assigns ids on
/// create and takes the id from the path on update, so none is sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoContent {
    pub content: String,
}

impl TodoContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Greeting {
    #[serde(rename = "Hello")]
    pub hello: String,
}

/// Error body the server sends with 4xx/5xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}
