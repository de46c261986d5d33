use std::sync::OnceLock;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager and the row store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database pool has not been initialized")]
    NotInitialized,

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Database did not answer within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// How a store failure should be surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Integrity constraint (SQLSTATE class 23) or data exception (class 22)
    Rejected,
    /// Duplicate key, SQLSTATE 23505
    UniqueViolation,
    /// Pool exhausted, connection refused, I/O
    Unavailable,
    Internal,
}

impl DatabaseError {
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
            _ => None,
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            DatabaseError::NotInitialized | DatabaseError::Timeout(_) => FailureClass::Unavailable,
            DatabaseError::Sqlx(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_),
            ) => FailureClass::Unavailable,
            DatabaseError::Sqlx(sqlx::Error::Database(_)) => self
                .sqlstate()
                .map(|code| classify_sqlstate(&code))
                .unwrap_or(FailureClass::Internal),
            _ => FailureClass::Internal,
        }
    }
}

pub fn classify_sqlstate(code: &str) -> FailureClass {
    if code == "23505" {
        FailureClass::UniqueViolation
    } else if code.starts_with("23") || code.starts_with("22") {
        FailureClass::Rejected
    } else if code.starts_with("08") || code.starts_with("57P") {
        FailureClass::Unavailable
    } else {
        FailureClass::Internal
    }
}

/// Process-wide connection pool with explicit init at startup and close at shutdown
pub struct DatabaseManager {
    pool: PgPool,
}

static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();

/// Upper bound for a health ping, independent of the pool's acquire timeout
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

impl DatabaseManager {
    /// Create the pool. Connections are opened lazily so the server can start
    /// before the database is reachable; the startup ping only logs the outcome.
    pub async fn init(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if let Some(existing) = INSTANCE.get() {
            return Ok(existing.pool.clone());
        }

        let url = config
            .connection_url()
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&url)?;

        let pool = INSTANCE.get_or_init(|| DatabaseManager { pool }).pool.clone();

        match sqlx::query("SELECT NOW()").execute(&pool).await {
            Ok(_) => info!("Database connected: {}/{}", config.host, config.name),
            Err(e) => warn!("Database connection error at startup: {}", e),
        }

        Ok(pool)
    }

    /// Shared pool; fails until `init` has run
    pub fn pool() -> Result<PgPool, DatabaseError> {
        INSTANCE
            .get()
            .map(|manager| manager.pool.clone())
            .ok_or(DatabaseError::NotInitialized)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool()?;
        Self::ping(&pool, HEALTH_CHECK_TIMEOUT).await
    }

    pub async fn ping(pool: &PgPool, limit: Duration) -> Result<(), DatabaseError> {
        match tokio::time::timeout(limit, sqlx::query("SELECT 1").execute(pool)).await {
            Ok(result) => result.map(|_| ()).map_err(DatabaseError::from),
            Err(_) => Err(DatabaseError::Timeout(limit)),
        }
    }

    /// Quote SQL identifier to prevent injection
    pub fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Wait for checked-out connections to return, then close the pool
    pub async fn close() {
        if let Some(manager) = INSTANCE.get() {
            manager.pool.close().await;
            info!("Closed database pool");
        }
    }
}
