//! HTTP service for a single `todo` table.
//!
//! # Overview
//! Five routes map one-to-one onto SQL statements. Each handler receives its
//! own pooled connection through the `DbSession` extractor; the pool lives in
//! `AppState` and is built once by the binary before the listener is bound.
//! `/openapi.json` describes the routes for external API consumers.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod state;

use std::future::Future;

use axum::{
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use model::Todo;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::read_root))
        .route("/openapi.json", get(openapi::openapi_json))
        .route("/todos/", get(routes::list_todos).post(routes::create_todo))
        .route("/todos", get(routes::list_todos).post(routes::create_todo))
        .route(
            "/todos/{task_id}",
            put(routes::update_todo).delete(routes::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
