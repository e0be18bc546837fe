//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Every route has a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. All successful
//! responses of this API are 200; 404 carries a `{"detail": ...}` body.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ErrorDetail, Greeting, Todo, TodoContent};

const OK: u16 = 200;
const NOT_FOUND: u16 = 404;

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_read_root(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/".to_string())
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/todos/".to_string())
    }

    pub fn build_create_todo(&self, input: &TodoContent) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/todos/".to_string(), input)
    }

    pub fn build_update_todo(&self, id: i64, input: &TodoContent) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, format!("/todos/{id}"), input)
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("/todos/{id}"))
    }

    pub fn parse_read_root(&self, response: HttpResponse) -> Result<Greeting, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn bare(&self, method: HttpMethod, route: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{route}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        route: String,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            ..self.bare(method, route)
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-200 status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        OK => Ok(()),
        NOT_FOUND => {
            let detail = serde_json::from_str::<ErrorDetail>(&response.body)
                .map(|e| e.detail)
                .unwrap_or_default();
            Err(ApiError::NotFound { detail })
        }
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
