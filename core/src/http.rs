//! HTTP transport types for the host-does-IO pattern.
//!
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values;
//! whoever holds the client performs the network round trip in between with
//! the HTTP library of their choice.

/// HTTP method for a request. Only the verbs the todo API routes are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL: the client's base URL plus the route.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data, filled in by the caller.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
