use sqlx::{Executor, PgPool};

use crate::database::manager::DatabaseError;

/// Reference DDL for every table the service reads or writes
pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Create any missing tables. Statements are idempotent.
pub async fn apply(pool: &PgPool) -> Result<(), DatabaseError> {
    pool.execute(SCHEMA_SQL).await?;
    tracing::info!("Applied database schema");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entity::ENTITIES;

    #[test]
    fn ddl_declares_every_allow_listed_column() {
        for entity in ENTITIES {
            assert!(
                SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS \"{}\"", entity.table)),
                "missing table {}",
                entity.table
            );
            for column in entity.columns {
                assert!(
                    SCHEMA_SQL.contains(&format!("\"{}\"", column.column)),
                    "{} is missing column {}",
                    entity.table,
                    column.column
                );
            }
        }
    }
}
