use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::SqlStatement;
use crate::database::record::Record;

/// Executes built statements and hands back decoded rows
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn fetch_optional(&self, stmt: &SqlStatement) -> Result<Option<Record>, DatabaseError>;

    async fn fetch_all(&self, stmt: &SqlStatement) -> Result<Vec<Record>, DatabaseError>;
}

#[async_trait]
impl RowStore for PgPool {
    async fn fetch_optional(&self, stmt: &SqlStatement) -> Result<Option<Record>, DatabaseError> {
        let started = Instant::now();
        let row = build_query(stmt).fetch_optional(self).await;
        log_query(stmt, started);
        row?.map(decode_row).transpose()
    }

    async fn fetch_all(&self, stmt: &SqlStatement) -> Result<Vec<Record>, DatabaseError> {
        let started = Instant::now();
        let rows = build_query(stmt).fetch_all(self).await;
        log_query(stmt, started);
        rows?.into_iter().map(decode_row).collect()
    }
}

/// The process-wide pool, resolved on each call. Statements that fail
/// validation never get this far, so they work before `DatabaseManager::init`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedPool;

#[async_trait]
impl RowStore for SharedPool {
    async fn fetch_optional(&self, stmt: &SqlStatement) -> Result<Option<Record>, DatabaseError> {
        DatabaseManager::pool()?.fetch_optional(stmt).await
    }

    async fn fetch_all(&self, stmt: &SqlStatement) -> Result<Vec<Record>, DatabaseError> {
        DatabaseManager::pool()?.fetch_all(stmt).await
    }
}

fn build_query(stmt: &SqlStatement) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    let mut q = sqlx::query(&stmt.query);
    for p in &stmt.params {
        q = p.bind(q);
    }
    q
}

fn decode_row(row: PgRow) -> Result<Record, DatabaseError> {
    match row.try_get::<Value, _>("row")? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!(
            "expected a JSON object row, got {}",
            other
        ))),
    }
}

// SQL text only; bound values may carry personal data
fn log_query(stmt: &SqlStatement, started: Instant) {
    let db = &config::config().database;
    let elapsed = started.elapsed();

    if db.enable_query_logging {
        tracing::debug!(params = stmt.params.len(), elapsed_ms = elapsed.as_millis() as u64, "{}", stmt.query);
    }
    if db.enable_slow_query_warning && elapsed.as_millis() as u64 > db.slow_query_threshold_ms {
        tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "Slow query: {}", stmt.query);
    }
}
