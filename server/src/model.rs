use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of the `todo` table.
///
/// `id` is `None` only for values that have not been persisted yet, such as a
/// request body. Every row read back from the database carries the id the
/// database assigned on insert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Todo {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
}

impl Todo {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
        }
    }
}
