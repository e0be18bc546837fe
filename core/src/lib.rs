//! Synchronous client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the HTTP round trip, which keeps
//! this crate free of any runtime or transport dependency.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each route is split into `build_*` (produces the request) and `parse_*`
//!   (consumes the response), so the I/O boundary is explicit.
//! - DTOs are defined independently from the server crate.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ErrorDetail, Greeting, Todo, TodoContent};
