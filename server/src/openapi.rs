//! OpenAPI document served at `/openapi.json`.
//!
//! Paths and schemas come from the `#[utoipa::path]` annotations on the
//! handlers. The `servers` entry is filled in at request time from the
//! configured public URL, so API consumers that import the document call the
//! externally reachable address.

use axum::{extract::State, Json};
use url::Url;
use utoipa::openapi::server::ServerBuilder;
use utoipa::OpenApi;

use crate::error::ErrorDetail;
use crate::model::Todo;
use crate::routes;
use crate::state::AppState;

pub const API_TITLE: &str = "Hello World API with DB";
pub const API_VERSION: &str = "0.0.1";

#[derive(OpenApi)]
#[openapi(
    info(title = "Hello World API with DB", version = "0.0.1"),
    paths(
        routes::read_root,
        routes::list_todos,
        routes::create_todo,
        routes::update_todo,
        routes::delete_todo,
    ),
    components(schemas(Todo, ErrorDetail))
)]
struct ApiDoc;

pub fn document(public_url: Option<&Url>) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if let Some(url) = public_url {
        doc.servers = Some(vec![ServerBuilder::new()
            .url(url.as_str().trim_end_matches('/'))
            .description(Some("Development Server"))
            .build()]);
    }
    doc
}

pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(document(state.public_url()))
}
