use chrono::NaiveDate;
use serde_json::Value;
use sqlx::MySqlPool;

use crate::error::AppError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Date(NaiveDate),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// A JSON field a client may change, and the column it maps to.
pub struct Updatable {
    pub field: &'static str,
    pub column: &'static str,
}

/// A validated `column = value` pair of a partial update.
pub type Assignment = (&'static str, SqlValue);

/// ===============================
/// Validate a JSON patch
/// ===============================
///
/// Only fields listed in `allowed` may appear in the payload; they must be
/// strings.
pub fn parse_patch(payload: &Value, allowed: &[Updatable]) -> Result<Vec<Assignment>, AppError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| AppError::Validation("Payload must be a JSON object".into()))?;

    if obj.is_empty() {
        return Err(AppError::Validation("No fields provided for update".into()));
    }

    obj.iter()
        .map(|(field, value)| {
            let column = allowed
                .iter()
                .find(|u| u.field == field)
                .map(|u| u.column)
                .ok_or_else(|| AppError::Validation(format!("Field `{field}` cannot be updated")))?;

            let Value::String(s) = value else {
                return Err(AppError::Validation(format!("Field `{field}` must be a string")));
            };

            // Dates travel as YYYY-MM-DD strings
            if column == "date" {
                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| AppError::Validation(format!("Invalid date `{s}`")))?;
                Ok((column, SqlValue::Date(date)))
            } else {
                Ok((column, SqlValue::String(s.clone())))
            }
        })
        .collect()
}

/// ===============================
/// Build a partial UPDATE
/// ===============================
///
/// Rows are matched on every `(column, value)` pair in `keys`.
pub fn build_update_sql(table: &str, assignments: Vec<Assignment>, keys: &[(&str, u64)]) -> SqlUpdate {
    let mut columns = Vec::with_capacity(assignments.len());
    let mut values = Vec::with_capacity(assignments.len() + keys.len());

    for (column, value) in assignments {
        columns.push(format!("{column} = ?"));
        values.push(value);
    }

    let conditions = keys
        .iter()
        .map(|(column, value)| {
            values.push(SqlValue::U64(*value));
            format!("{column} = ?")
        })
        .collect::<Vec<_>>()
        .join(" AND ");

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        columns.join(", "),
        conditions
    );

    SqlUpdate { sql, values }
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[Updatable] = &[
        Updatable { field: "reason", column: "reason" },
        Updatable { field: "permissionIn", column: "permission_in" },
        Updatable { field: "date", column: "date" },
    ];

    #[test]
    fn builds_update_for_whitelisted_fields() {
        let assignments = parse_patch(
            &json!({"permissionIn": "10:00 AM", "date": "2025-02-03"}),
            FIELDS,
        )
        .unwrap();
        let update = build_update_sql("permissions", assignments, &[("id", 7), ("user_id", 42)]);

        assert!(update.sql.starts_with("UPDATE permissions SET "));
        assert!(update.sql.contains("permission_in = ?"));
        assert!(update.sql.contains("date = ?"));
        assert!(update.sql.ends_with("WHERE id = ? AND user_id = ?"));
        assert_eq!(update.values.len(), 4);
        assert!(update.values.contains(&SqlValue::String("10:00 AM".into())));
        assert!(update.values.contains(&SqlValue::Date(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap())));
        assert_eq!(update.values[2..], [SqlValue::U64(7), SqlValue::U64(42)]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_patch(&json!({"user_id": "1"}), FIELDS);
        assert!(matches!(err, Err(AppError::Validation(msg)) if msg.contains("user_id")));
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(parse_patch(&json!({}), FIELDS).is_err());
        assert!(parse_patch(&json!(["reason"]), FIELDS).is_err());
    }

    #[test]
    fn rejects_non_string_values_and_bad_dates() {
        assert!(parse_patch(&json!({"reason": 5}), FIELDS).is_err());
        assert!(parse_patch(&json!({"date": "03/02/2025"}), FIELDS).is_err());
    }
}
