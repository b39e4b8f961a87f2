use super::{
    error::PersistenceError,
    store::{IdentityStore, UserId},
};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Connection, SqlitePool,
};
use std::str::FromStr;
use tracing::{info_span, Instrument};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/sqlite.sql"));

const UPSERT_SQL: &str = "INSERT INTO users (id, email) VALUES (?, ?) \
     ON CONFLICT (email) DO UPDATE SET email = excluded.email \
     RETURNING id";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM users WHERE email = ?";

/// SQLite-backed identity store, file or in-memory.
#[derive(Debug, Clone)]
pub struct SqliteIdentityStore {
    pool: SqlitePool,
}

fn is_in_memory(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

impl SqliteIdentityStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `dsn` (`sqlite://path.db`, `sqlite::memory:`).
    ///
    /// An in-memory database lives and dies with its connection, so the pool is
    /// pinned to a single connection that is never recycled.
    ///
    /// # Errors
    /// Returns `PersistenceError::Unavailable` if the DSN is invalid or the file
    /// cannot be opened.
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str(dsn)
            .map_err(PersistenceError::Unavailable)?
            .create_if_missing(true);

        let (pool_options, options) = if is_in_memory(dsn) {
            (
                SqlitePoolOptions::new()
                    .min_connections(1)
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None),
                options,
            )
        } else {
            (
                SqlitePoolOptions::new().max_connections(max_connections),
                options.journal_mode(SqliteJournalMode::Wal),
            )
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(PersistenceError::Unavailable)?;

        Ok(Self::new(pool))
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        let span = info_span!("db.query", db.system = "sqlite", db.operation = "CREATE");
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(())
    }

    async fn upsert_by_email(&self, email: &str) -> Result<UserId, PersistenceError> {
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "UPSERT",
            db.statement = UPSERT_SQL
        );
        let id: Option<Uuid> = sqlx::query_scalar(UPSERT_SQL)
            .bind(*UserId::candidate().as_uuid())
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        id.map(UserId::from_uuid).ok_or_else(|| {
            PersistenceError::MalformedResponse(format!("upsert returned no id for {email}"))
        })
    }

    async fn count_by_email(&self, email: &str) -> Result<u64, PersistenceError> {
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = COUNT_SQL
        );
        let count: i64 = sqlx::query_scalar(COUNT_SQL)
            .bind(email)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        u64::try_from(count)
            .map_err(|_| PersistenceError::MalformedResponse(format!("negative count {count}")))
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(PersistenceError::Unavailable)?;
        conn.ping().await.map_err(PersistenceError::Unavailable)
    }
}
