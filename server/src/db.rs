//! Connection pool construction and schema provisioning.
//!
//! # Design
//! The pool is a `sqlx::AnyPool`; the concrete driver is chosen from the
//! connection string scheme after `DatabaseUrl::parse` has normalised it.
//! PostgreSQL connections always run with at least `sslmode=require`.
//! SQLite is accepted for local runs and tests: database files are created
//! when missing, and an in-memory database is pinned to a single connection
//! that is never recycled, since every `:memory:` connection is its own
//! database.

use std::fmt;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use thiserror::Error;
use url::Url;

/// Pooled connections older than this are closed instead of reused.
pub const CONNECTION_RECYCLE_AFTER: Duration = Duration::from_secs(300);

const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS ix_todo_content ON todo (content)";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unsupported database scheme `{0}`, expected postgresql, postgres or sqlite")]
    UnsupportedScheme(String),

    #[error("invalid database url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    Sqlite,
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Postgres => write!(f, "postgres"),
            Driver::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl Driver {
    fn create_table(self) -> &'static str {
        match self {
            Driver::Postgres => {
                r#"
                CREATE TABLE IF NOT EXISTS todo (
                    id BIGSERIAL PRIMARY KEY,
                    content TEXT NOT NULL
                )
                "#
            }
            Driver::Sqlite => {
                r#"
                CREATE TABLE IF NOT EXISTS todo (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    content TEXT NOT NULL
                )
                "#
            }
        }
    }
}

/// A connection string whose scheme has been rewritten for the `Any` driver.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    driver: Driver,
    url: String,
    in_memory: bool,
}

impl DatabaseUrl {
    pub fn parse(raw: &str) -> Result<Self, DbError> {
        let raw = raw.trim();
        let scheme = raw.split(':').next().unwrap_or_default();
        match scheme {
            "postgresql" | "postgres" => {
                let mut url = Url::parse(raw)?;
                url.set_scheme("postgres")
                    .map_err(|()| DbError::UnsupportedScheme(scheme.to_string()))?;
                require_tls(&mut url);
                Ok(Self {
                    driver: Driver::Postgres,
                    url: url.into(),
                    in_memory: false,
                })
            }
            "sqlite" => {
                let in_memory = raw.contains(":memory:") || raw.contains("mode=memory");
                let url = if in_memory || raw.contains("mode=") {
                    raw.to_string()
                } else if raw.contains('?') {
                    format!("{raw}&mode=rwc")
                } else {
                    format!("{raw}?mode=rwc")
                };
                Ok(Self {
                    driver: Driver::Sqlite,
                    url,
                    in_memory,
                })
            }
            other => Err(DbError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    /// The connection string with any password replaced, for logging.
    pub fn redacted(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("***"));
                url.into()
            }
            _ => self.url.clone(),
        }
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseUrl")
            .field("driver", &self.driver)
            .field("url", &self.redacted())
            .finish()
    }
}

/// Force `sslmode=require` unless a verifying mode was already requested.
fn require_tls(url: &mut Url) {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let verifying = pairs
        .iter()
        .any(|(k, v)| k == "sslmode" && matches!(v.as_str(), "verify-ca" | "verify-full"));
    if verifying {
        return;
    }

    pairs.retain(|(k, _)| k != "sslmode");
    pairs.push(("sslmode".to_string(), "require".to_string()));
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Build the connection pool and open its first connection, so an unreachable
/// database fails here rather than on the first request.
///
/// For an in-memory SQLite URL `max_connections` is ignored: the pool keeps
/// exactly one connection alive for the life of the process.
pub async fn connect(url: &DatabaseUrl, max_connections: u32) -> Result<AnyPool, DbError> {
    sqlx::any::install_default_drivers();

    let (max_connections, recycle_after) = if url.is_in_memory() {
        (1, None)
    } else {
        (max_connections, Some(CONNECTION_RECYCLE_AFTER))
    };

    let mut options = AnyPoolOptions::new()
        .max_connections(max_connections)
        .max_lifetime(recycle_after);
    if url.is_in_memory() {
        options = options.min_connections(1).idle_timeout(None);
    }

    let pool = options.connect(url.as_str()).await?;

    tracing::info!(
        database = %url.driver(),
        max_connections,
        recycle_after_secs = recycle_after.map(|d| d.as_secs()),
        "Database pool ready"
    );
    Ok(pool)
}

/// Create the `todo` table and its content index. Safe to run on every boot.
pub async fn create_schema(pool: &AnyPool, driver: Driver) -> Result<(), DbError> {
    tracing::info!(database = %driver, "Provisioning todo schema");

    sqlx::query(driver.create_table()).execute(pool).await?;
    sqlx::query(CREATE_INDEX).execute(pool).await?;

    Ok(())
}
