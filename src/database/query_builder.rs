use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::database::entity::{ColumnDef, EntitySchema};
use crate::database::manager::DatabaseManager;
use crate::database::params::SqlParam;
use crate::database::record::{EntityId, RecordError};

/// Parameterized SQL text plus its positional parameters.
///
/// Every statement produced here selects `row_to_json(..) AS row`, so the store
/// only ever decodes a single JSON column regardless of the table shape.
#[derive(Debug, Clone)]
pub struct SqlStatement {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Builds statements for one allow-listed entity
pub struct QueryBuilder {
    entity: &'static EntitySchema,
}

impl QueryBuilder {
    pub fn new(entity: &'static EntitySchema) -> Self {
        Self { entity }
    }

    pub(crate) fn table(&self) -> String {
        DatabaseManager::quote_identifier(self.entity.table)
    }

    pub(crate) fn primary_key(&self) -> String {
        DatabaseManager::quote_identifier(self.entity.primary_key)
    }

    pub fn select_all(&self) -> SqlStatement {
        SqlStatement {
            query: format!(
                "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} ORDER BY {}) t",
                self.table(),
                self.primary_key()
            ),
            params: vec![],
        }
    }

    pub fn select_by_id(&self, id: EntityId) -> SqlStatement {
        SqlStatement {
            query: format!(
                "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} WHERE {} = $1) t",
                self.table(),
                self.primary_key()
            ),
            params: vec![SqlParam::Integer(id.get())],
        }
    }

    pub fn delete_by_id(&self, id: EntityId) -> SqlStatement {
        SqlStatement {
            query: format!(
                "WITH removed AS (DELETE FROM {} WHERE {} = $1 RETURNING *) \
                 SELECT row_to_json(removed) AS row FROM removed",
                self.table(),
                self.primary_key()
            ),
            params: vec![SqlParam::Integer(id.get())],
        }
    }

    /// INSERT of the provided allow-listed fields. Columns not provided fall
    /// back to their database defaults.
    pub fn insert(&self, fields: &Map<String, Value>) -> Result<SqlStatement, RecordError> {
        let accepted = self.accept_fields(fields)?;

        let mut missing = HashMap::new();
        for field in self.entity.required {
            let present = accepted
                .iter()
                .any(|(c, p)| c.field == *field && !matches!(p, SqlParam::Null(_)));
            if !present {
                missing.insert(field.to_string(), "This field is required".to_string());
            }
        }
        if !missing.is_empty() {
            return Err(RecordError::validation("Missing required fields", missing));
        }

        let columns: Vec<String> = accepted
            .iter()
            .map(|(c, _)| DatabaseManager::quote_identifier(c.column))
            .collect();
        let placeholders: Vec<String> = (1..=accepted.len()).map(|i| format!("${}", i)).collect();

        Ok(SqlStatement {
            query: format!(
                "WITH inserted AS (INSERT INTO {} ({}) VALUES ({}) RETURNING *) \
                 SELECT row_to_json(inserted) AS row FROM inserted",
                self.table(),
                columns.join(", "),
                placeholders.join(", ")
            ),
            params: accepted.into_iter().map(|(_, p)| p).collect(),
        })
    }

    /// Validate caller keys against the allow-list and coerce their values.
    ///
    /// Unknown keys and bad values are collected so the caller sees every
    /// problem at once. Accepted columns come back in schema order, which keeps
    /// the generated SQL independent of the request's key order.
    pub(crate) fn accept_fields(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<Vec<(&'static ColumnDef, SqlParam)>, RecordError> {
        let mut field_errors = HashMap::new();
        for key in fields.keys() {
            if !self.entity.is_writable(key) {
                field_errors.insert(key.clone(), "Unknown field".to_string());
            }
        }

        let mut accepted = Vec::with_capacity(fields.len());
        for column in self.entity.columns {
            if let Some(value) = fields.get(column.field) {
                match SqlParam::coerce(column.kind, value) {
                    Ok(param) => accepted.push((column, param)),
                    Err(reason) => {
                        field_errors.insert(column.field.to_string(), reason);
                    }
                }
            }
        }

        if !field_errors.is_empty() {
            return Err(RecordError::validation(
                format!("Invalid fields for {}", self.entity.name),
                field_errors,
            ));
        }

        Ok(accepted)
    }
}
