//! Partial updates built from caller-supplied field sets.
//!
//! Caller keys are never placed in SQL text. Each key is looked up in the
//! entity allow-list and replaced by that column's fixed identifier; values only
//! ever travel as positional parameters. Validation runs to completion before
//! any statement reaches the store, so a rejected patch issues no SQL.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::database::entity::EntitySchema;
use crate::database::manager::DatabaseManager;
use crate::database::params::SqlParam;
use crate::database::query_builder::{QueryBuilder, SqlStatement};
use crate::database::record::{EntityId, Record, RecordError};
use crate::database::store::RowStore;

impl QueryBuilder {
    /// `UPDATE <table> SET "c1" = $1, ... WHERE "id" = $n RETURNING *`, with the
    /// id bound last.
    pub fn update(&self, id: EntityId, fields: &Map<String, Value>) -> Result<SqlStatement, RecordError> {
        if fields.is_empty() {
            return Err(RecordError::validation("No fields to update", HashMap::new()));
        }

        let accepted = self.accept_fields(fields)?;

        let set_clauses: Vec<String> = accepted
            .iter()
            .enumerate()
            .map(|(i, (column, _))| {
                format!("{} = ${}", DatabaseManager::quote_identifier(column.column), i + 1)
            })
            .collect();

        let mut params: Vec<SqlParam> = accepted.into_iter().map(|(_, p)| p).collect();
        params.push(SqlParam::Integer(id.get()));

        Ok(SqlStatement {
            query: format!(
                "WITH patched AS (UPDATE {} SET {} WHERE {} = ${} RETURNING *) \
                 SELECT row_to_json(patched) AS row FROM patched",
                self.table(),
                set_clauses.join(", "),
                self.primary_key(),
                params.len()
            ),
            params,
        })
    }
}

/// Apply a partial update to one row and return the row as stored afterwards
pub async fn apply_patch<S>(
    store: &S,
    entity: &'static EntitySchema,
    id: EntityId,
    fields: &Map<String, Value>,
) -> Result<Record, RecordError>
where
    S: RowStore + ?Sized,
{
    let stmt = QueryBuilder::new(entity).update(id, fields)?;

    tracing::debug!(
        "Patching {} record {}: fields={:?}",
        entity.name,
        id,
        fields.keys().collect::<Vec<_>>()
    );

    match store.fetch_optional(&stmt).await? {
        Some(record) => Ok(record),
        None => Err(RecordError::NotFound { entity: entity.name, id }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::entity::{ColumnKind, ALCHEMY_ROUTING, CTS};
    use crate::database::manager::DatabaseError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory store that records every statement it receives and answers
    /// with a canned row.
    #[derive(Default)]
    pub(crate) struct RecordingStore {
        pub statements: Mutex<Vec<SqlStatement>>,
        pub row: Option<Record>,
        pub rows: Vec<Record>,
    }

    impl RecordingStore {
        pub fn returning(row: Value) -> Self {
            Self {
                row: row.as_object().cloned(),
                ..Self::default()
            }
        }

        pub fn issued(&self) -> usize {
            self.statements.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RowStore for RecordingStore {
        async fn fetch_optional(&self, stmt: &SqlStatement) -> Result<Option<Record>, DatabaseError> {
            self.statements.lock().unwrap().push(stmt.clone());
            Ok(self.row.clone())
        }

        async fn fetch_all(&self, stmt: &SqlStatement) -> Result<Vec<Record>, DatabaseError> {
            self.statements.lock().unwrap().push(stmt.clone());
            Ok(self.rows.clone())
        }
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn id(n: i64) -> EntityId {
        EntityId::new(n).unwrap()
    }

    #[test]
    fn builds_positional_set_clause_with_id_last() {
        let stmt = QueryBuilder::new(&CTS)
            .update(id(7), &obj(json!({ "vendor_name": "Acme", "pax": 12 })))
            .unwrap();

        assert_eq!(
            stmt.query,
            "WITH patched AS (UPDATE \"CTS\" SET \"vendor_name\" = $1, \"pax\" = $2 WHERE \"id\" = $3 RETURNING *) \
             SELECT row_to_json(patched) AS row FROM patched"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Text("Acme".into()),
                SqlParam::Integer(12),
                SqlParam::Integer(7),
            ]
        );
    }

    #[test]
    fn column_order_follows_schema_not_request() {
        let stmt = QueryBuilder::new(&CTS)
            .update(id(1), &obj(json!({ "remarks": "late", "vendor_name": "Acme" })))
            .unwrap();
        let vendor = stmt.query.find("\"vendor_name\" = $1").unwrap();
        let remarks = stmt.query.find("\"remarks\" = $2").unwrap();
        assert!(vendor < remarks);
    }

    #[test]
    fn quotes_routing_columns_with_punctuation() {
        let stmt = QueryBuilder::new(&ALCHEMY_ROUTING)
            .update(id(3), &obj(json!({ "Payment Day's": 30, "CGST @ 9%": "900.00" })))
            .unwrap();
        assert!(stmt.query.contains("SET \"Payment Day's\" = $1, \"CGST @ 9%\" = $2 WHERE \"id\" = $3"));
    }

    #[test]
    fn null_values_are_typed_by_column() {
        let stmt = QueryBuilder::new(&CTS)
            .update(id(2), &obj(json!({ "invoice_date": null })))
            .unwrap();
        assert_eq!(stmt.params[0], SqlParam::Null(ColumnKind::Date));
    }

    #[tokio::test]
    async fn patch_returns_updated_row() {
        let store = RecordingStore::returning(json!({
            "id": 7, "vendor_name": "Acme", "pax": 10, "remarks": "unchanged"
        }));

        let record = apply_patch(&store, &CTS, id(7), &obj(json!({ "vendor_name": "Acme" })))
            .await
            .unwrap();

        assert_eq!(record["vendor_name"], json!("Acme"));
        assert_eq!(record["remarks"], json!("unchanged"));
        assert_eq!(store.issued(), 1);

        let issued = store.statements.lock().unwrap();
        assert!(issued[0].query.contains("SET \"vendor_name\" = $1 WHERE \"id\" = $2"));
        assert_eq!(issued[0].params.len(), 2);
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let store = RecordingStore::default();

        let err = apply_patch(&store, &CTS, id(999), &obj(json!({ "vendor_name": "X" })))
            .await
            .unwrap_err();

        match err {
            RecordError::NotFound { entity, id } => {
                assert_eq!(entity, "CTS");
                assert_eq!(id.get(), 999);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_patch_issues_no_sql() {
        let store = RecordingStore::default();

        let err = apply_patch(&store, &CTS, id(7), &Map::new()).await.unwrap_err();

        assert!(matches!(err, RecordError::Validation { .. }));
        assert_eq!(store.issued(), 0);
    }

    #[tokio::test]
    async fn unknown_field_issues_no_sql() {
        let store = RecordingStore::default();

        let err = apply_patch(
            &store,
            &CTS,
            id(7),
            &obj(json!({ "vendor_name": "Acme", "vendor_name\" = 'x'; --": "boom" })),
        )
        .await
        .unwrap_err();

        match err {
            RecordError::Validation { field_errors, .. } => {
                assert_eq!(field_errors.len(), 1);
                assert_eq!(field_errors["vendor_name\" = 'x'; --"], "Unknown field");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.issued(), 0);
    }

    #[tokio::test]
    async fn uncoercible_value_issues_no_sql() {
        let store = RecordingStore::default();

        let err = apply_patch(&store, &CTS, id(7), &obj(json!({ "start_date": "next tuesday" })))
            .await
            .unwrap_err();

        match err {
            RecordError::Validation { field_errors, .. } => {
                assert!(field_errors["start_date"].starts_with("Expected a date"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.issued(), 0);
    }
}
