use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::manager::{DatabaseError, FailureClass};

/// A stored row, column name to JSON value
pub type Record = Map<String, Value>;

/// Primary key of a ledger row. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(i64);

impl EntityId {
    pub fn new(id: i64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for EntityId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Digits only: i64::from_str would also take a leading '+'
        Some(s)
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(EntityId::new)
            .ok_or_else(|| RecordError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Invalid record id: {0}")]
    InvalidId(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("{entity} record {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    #[error(transparent)]
    Storage(DatabaseError),
}

impl RecordError {
    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        RecordError::Validation {
            message: message.into(),
            field_errors,
        }
    }
}

impl From<DatabaseError> for RecordError {
    /// Constraint and data violations raised by Postgres are the caller's fault;
    /// everything else stays a storage failure.
    fn from(err: DatabaseError) -> Self {
        match err.class() {
            FailureClass::Rejected | FailureClass::UniqueViolation => {
                tracing::warn!(
                    "Write rejected by database (sqlstate {}): {}",
                    err.sqlstate().unwrap_or_default(),
                    err
                );
                RecordError::validation("Value rejected by a database constraint", HashMap::new())
            }
            _ => RecordError::Storage(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!("7".parse::<EntityId>().unwrap().get(), 7);
        assert!(matches!("0".parse::<EntityId>(), Err(RecordError::InvalidId(_))));
        assert!(matches!("-3".parse::<EntityId>(), Err(RecordError::InvalidId(_))));
        assert!(matches!("7 OR 1=1".parse::<EntityId>(), Err(RecordError::InvalidId(_))));
        assert!(matches!("+7".parse::<EntityId>(), Err(RecordError::InvalidId(_))));
        assert!(matches!(" 7".parse::<EntityId>(), Err(RecordError::InvalidId(_))));
        assert!(matches!("".parse::<EntityId>(), Err(RecordError::InvalidId(_))));
    }

    #[test]
    fn non_constraint_failures_stay_storage_errors() {
        let err: RecordError = DatabaseError::QueryError("unexpected row shape".into()).into();
        assert!(matches!(err, RecordError::Storage(_)));
    }
}
