use super::{
    error::PersistenceError,
    store::{IdentityStore, UserId},
};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use std::time::Duration;
use tracing::{info_span, Instrument};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/postgres.sql"));

// The no-op update makes a conflicting insert return the existing row.
const UPSERT_SQL: &str = "INSERT INTO users (id, email) VALUES ($1, $2) \
     ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email \
     RETURNING id";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM users WHERE email = $1";

/// Postgres-backed identity store.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool for `dsn`.
    ///
    /// # Errors
    /// Returns `PersistenceError::Unavailable` if the database cannot be reached.
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .map_err(PersistenceError::Unavailable)?;

        Ok(Self::new(pool))
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    fn backend(&self) -> &'static str {
        "postgresql"
    }

    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "CREATE");
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(())
    }

    async fn upsert_by_email(&self, email: &str) -> Result<UserId, PersistenceError> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
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
            db.system = "postgresql",
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
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .map_err(PersistenceError::Unavailable)?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .map_err(PersistenceError::Unavailable)
    }
}
