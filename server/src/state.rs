//! Application state shared across handlers

use sqlx::AnyPool;
use url::Url;

/// Cloned into every request; the pool itself is reference counted.
#[derive(Clone)]
pub struct AppState {
    pool: AnyPool,
    public_url: Option<Url>,
}

impl AppState {
    pub fn new(pool: AnyPool) -> Self {
        Self {
            pool,
            public_url: None,
        }
    }

    /// Advertise `public_url` as the server entry of the OpenAPI document.
    pub fn with_public_url(mut self, public_url: Option<Url>) -> Self {
        self.public_url = public_url;
        self
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn public_url(&self) -> Option<&Url> {
        self.public_url.as_ref()
    }
}
