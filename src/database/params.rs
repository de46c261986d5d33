use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::types::BigDecimal;

use crate::database::entity::ColumnKind;

/// A bind parameter already coerced to the type of its target column
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// NULL typed for its column so Postgres does not infer `text`
    Null(ColumnKind),
    Text(String),
    Integer(i64),
    Numeric(BigDecimal),
    Date(NaiveDate),
    Boolean(bool),
}

impl SqlParam {
    /// Coerce an untrusted JSON value for a column of the given kind.
    /// The error string is meant for the caller and names what was expected.
    pub fn coerce(kind: ColumnKind, value: &Value) -> Result<SqlParam, String> {
        if let Value::String(s) = value {
            if s.trim().is_empty() {
                return Ok(SqlParam::Null(kind));
            }
        }

        match (kind, value) {
            (_, Value::Null) => Ok(SqlParam::Null(kind)),
            (_, Value::Array(_) | Value::Object(_)) => Err("Nested values are not allowed".to_string()),

            (ColumnKind::Text, Value::String(s)) => Ok(SqlParam::Text(s.clone())),
            (ColumnKind::Text, Value::Number(n)) => Ok(SqlParam::Text(n.to_string())),
            (ColumnKind::Text, Value::Bool(b)) => Ok(SqlParam::Text(b.to_string())),

            (ColumnKind::Integer, Value::Number(n)) => n
                .as_i64()
                .map(SqlParam::Integer)
                .ok_or_else(|| format!("Expected an integer, got {}", n)),
            (ColumnKind::Integer, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(SqlParam::Integer)
                .map_err(|_| format!("Expected an integer, got '{}'", s)),

            (ColumnKind::Numeric, Value::Number(n)) => BigDecimal::from_str(&n.to_string())
                .map(SqlParam::Numeric)
                .map_err(|_| format!("Expected a number, got {}", n)),
            (ColumnKind::Numeric, Value::String(s)) => BigDecimal::from_str(s.trim())
                .map(SqlParam::Numeric)
                .map_err(|_| format!("Expected a number, got '{}'", s)),

            (ColumnKind::Date, Value::String(s)) => parse_date(s.trim())
                .map(SqlParam::Date)
                .ok_or_else(|| format!("Expected a date (YYYY-MM-DD), got '{}'", s)),

            (ColumnKind::Boolean, Value::Bool(b)) => Ok(SqlParam::Boolean(*b)),
            (ColumnKind::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(SqlParam::Boolean(true)),
                "false" => Ok(SqlParam::Boolean(false)),
                _ => Err(format!("Expected true or false, got '{}'", s)),
            },

            (ColumnKind::Date, other) => Err(format!("Expected a date (YYYY-MM-DD), got {}", other)),
            (ColumnKind::Integer, other) => Err(format!("Expected an integer, got {}", other)),
            (ColumnKind::Numeric, other) => Err(format!("Expected a number, got {}", other)),
            (ColumnKind::Boolean, other) => Err(format!("Expected true or false, got {}", other)),
        }
    }

    pub fn bind<'q>(
        &self,
        q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
        match self {
            SqlParam::Null(kind) => match kind {
                ColumnKind::Text => q.bind(None::<String>),
                ColumnKind::Integer => q.bind(None::<i64>),
                ColumnKind::Numeric => q.bind(None::<BigDecimal>),
                ColumnKind::Date => q.bind(None::<NaiveDate>),
                ColumnKind::Boolean => q.bind(None::<bool>),
            },
            SqlParam::Text(s) => q.bind(s.clone()),
            SqlParam::Integer(i) => q.bind(*i),
            SqlParam::Numeric(d) => q.bind(d.clone()),
            SqlParam::Date(d) => q.bind(*d),
            SqlParam::Boolean(b) => q.bind(*b),
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_and_null_become_typed_null() {
        assert_eq!(SqlParam::coerce(ColumnKind::Date, &json!("")), Ok(SqlParam::Null(ColumnKind::Date)));
        assert_eq!(SqlParam::coerce(ColumnKind::Text, &json!("   ")), Ok(SqlParam::Null(ColumnKind::Text)));
        assert_eq!(SqlParam::coerce(ColumnKind::Numeric, &Value::Null), Ok(SqlParam::Null(ColumnKind::Numeric)));
    }

    #[test]
    fn text_accepts_scalars() {
        assert_eq!(SqlParam::coerce(ColumnKind::Text, &json!("Acme")), Ok(SqlParam::Text("Acme".into())));
        assert_eq!(
            SqlParam::coerce(ColumnKind::Text, &json!(9876543210u64)),
            Ok(SqlParam::Text("9876543210".into()))
        );
        assert!(SqlParam::coerce(ColumnKind::Text, &json!(["a"])).is_err());
    }

    #[test]
    fn integers_reject_fractions_and_words() {
        assert_eq!(SqlParam::coerce(ColumnKind::Integer, &json!(12)), Ok(SqlParam::Integer(12)));
        assert_eq!(SqlParam::coerce(ColumnKind::Integer, &json!(" 7 ")), Ok(SqlParam::Integer(7)));
        assert!(SqlParam::coerce(ColumnKind::Integer, &json!(1.5)).is_err());
        assert!(SqlParam::coerce(ColumnKind::Integer, &json!("seven")).is_err());
        assert!(SqlParam::coerce(ColumnKind::Integer, &json!(true)).is_err());
    }

    #[test]
    fn numerics_keep_precision() {
        let p = SqlParam::coerce(ColumnKind::Numeric, &json!("125000.75")).unwrap();
        assert_eq!(p, SqlParam::Numeric(BigDecimal::from_str("125000.75").unwrap()));
        assert!(SqlParam::coerce(ColumnKind::Numeric, &json!(18)).is_ok());
        assert!(SqlParam::coerce(ColumnKind::Numeric, &json!("12,000")).is_err());
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(SqlParam::coerce(ColumnKind::Date, &json!("2024-03-15")), Ok(SqlParam::Date(expected)));
        assert_eq!(
            SqlParam::coerce(ColumnKind::Date, &json!("2024-03-15T00:00:00.000Z")),
            Ok(SqlParam::Date(expected))
        );
        assert!(SqlParam::coerce(ColumnKind::Date, &json!("15/03/2024")).is_err());
        assert!(SqlParam::coerce(ColumnKind::Date, &json!(20240315)).is_err());
    }

    #[test]
    fn booleans_accept_strings() {
        assert_eq!(SqlParam::coerce(ColumnKind::Boolean, &json!("TRUE")), Ok(SqlParam::Boolean(true)));
        assert_eq!(SqlParam::coerce(ColumnKind::Boolean, &json!(false)), Ok(SqlParam::Boolean(false)));
        assert!(SqlParam::coerce(ColumnKind::Boolean, &json!("yes")).is_err());
    }
}
