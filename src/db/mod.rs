//! Database module: pool handle, schema bootstrap, seeds, and row models.
//!
//! Layout:
//! - `schema.rs`: SQL DDL and the additive column tables
//! - `seed.rs`: default datasets inserted into empty tables
//! - `update.rs`: three-state patch fields and the sparse UPDATE builder
//! - `models.rs`: Rust structs mirroring DB rows

pub mod models;
pub mod schema;
pub mod seed;
pub mod update;

pub use update::{Field, SparseUpdate};

use crate::error::ApiError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::info;

/// Process-scoped database handle.
///
/// Holds the connection string and the memoized pool. Nothing connects until
/// the first data operation asks for the pool; the schema/seed bootstrap runs
/// inside that first call.
#[derive(Clone)]
pub struct Db {
    inner: Arc<DbInner>,
}

struct DbInner {
    url: Option<String>,
    /// Initialization memo. Empty until the first successful bootstrap; the
    /// lock doubles as the single-flight guard for concurrent first requests.
    pool: Mutex<Option<SqlitePool>>,
}

impl Db {
    pub fn new(url: Option<String>) -> Self {
        Self {
            inner: Arc::new(DbInner {
                url: url.filter(|u| !u.is_empty()),
                pool: Mutex::new(None),
            }),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.url.is_some()
    }

    /// Returns the initialized pool, bootstrapping schema and seeds on the
    /// first call per process.
    ///
    /// Concurrent first callers share one attempt behind the lock; a failed
    /// attempt leaves the memo empty so the next caller retries. Without a
    /// configured URL this fails fast with `NotConfigured` and never touches
    /// the store.
    pub async fn pool(&self) -> Result<SqlitePool, ApiError> {
        let Some(url) = self.inner.url.as_deref() else {
            return Err(ApiError::NotConfigured);
        };

        let mut slot = self.inner.pool.lock().await;
        if let Some(pool) = slot.as_ref() {
            return Ok(pool.clone());
        }

        let pool = connect(url).await?;
        initialize(&pool).await?;
        info!("database schema initialized");
        *slot = Some(pool.clone());
        Ok(pool)
    }
}

async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let connect_opts = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    SqlitePoolOptions::new().connect_with(connect_opts).await
}

async fn initialize(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    apply_schema(pool).await?;
    ensure_columns(pool, "faculty", schema::FACULTY_EXTRA_COLUMNS).await?;
    ensure_columns(pool, "modules", schema::MODULE_EXTRA_COLUMNS).await?;
    seed::seed_defaults(pool).await?;
    Ok(())
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for stmt in schema::SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

/// Adds any missing column from `wanted` to `table`.
///
/// Table and column names come from in-crate constants, never request data.
async fn ensure_columns(
    pool: &SqlitePool,
    table: &str,
    wanted: &[(&str, &str)],
) -> Result<(), sqlx::Error> {
    let existing: Vec<String> =
        sqlx::query_scalar(&format!("SELECT name FROM pragma_table_info('{table}')"))
            .fetch_all(pool)
            .await?;

    for (column, ddl) in wanted {
        if existing.iter().any(|c| c == column) {
            continue;
        }
        sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {ddl}"))
            .execute(pool)
            .await?;
    }
    Ok(())
}
