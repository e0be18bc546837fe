//! Per-request database session.
//!
//! `DbSession` is taken as a handler argument. The pooled connection it wraps
//! is returned to the pool when the handler's scope ends, whichever way it
//! ends, so the response is never sent while the handler still holds it.

use std::ops::{Deref, DerefMut};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::AnyConnection;
use sqlx::pool::PoolConnection;
use sqlx::Any;

use crate::error::ApiError;
use crate::state::AppState;

pub struct DbSession(PoolConnection<Any>);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let conn = state.pool().acquire().await?;
        Ok(Self(conn))
    }
}

impl Deref for DbSession {
    type Target = AnyConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
