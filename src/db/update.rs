//! Sparse UPDATE assembly.
//!
//! JSON patch payloads need three states per field: absent ("leave
//! unchanged"), explicit null ("clear"), and a value. A plain `Option`
//! collapses the first two, so patch structs use [`Field`] instead.

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, sqlite::SqliteRow};

use crate::error::ApiError;

/// Three-state JSON field: absent / explicit null / value.
///
/// Deserializing `null` yields `Null`; deserializing a value yields
/// `Value`. `Missing` is only ever produced by `#[serde(default)]` when the
/// key is absent from the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    /// Applies `f` to a present value, preserving `Missing`/`Null`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Missing => Field::Missing,
            Field::Null => Field::Null,
            Field::Value(v) => Field::Value(f(v)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// Builds one parameterized `UPDATE` over the staged columns.
///
/// The table and column names are string literals supplied by the resource
/// handlers (a fixed allowlist), never request data; only values travel as
/// bind parameters. The statement always touches `updated_at` and asks the
/// updated row back, so callers can distinguish "nothing matched" from
/// success.
pub struct SparseUpdate {
    qb: QueryBuilder<'static, Sqlite>,
    fields: usize,
}

impl SparseUpdate {
    pub fn new(table: &str) -> Self {
        Self {
            qb: QueryBuilder::new(format!("UPDATE {table} SET ")),
            fields: 0,
        }
    }

    /// Stages one column: `Missing` is skipped, `Null` clears, `Value` assigns.
    pub fn set<T>(&mut self, column: &str, field: Field<T>) -> &mut Self
    where
        T: sqlx::Encode<'static, Sqlite> + sqlx::Type<Sqlite> + Send + 'static,
    {
        let value = match field {
            Field::Missing => return self,
            Field::Null => None,
            Field::Value(v) => Some(v),
        };
        if self.fields > 0 {
            self.qb.push(", ");
        }
        self.qb.push(column).push(" = ").push_bind(value);
        self.fields += 1;
        self
    }

    /// True when every staged field was `Missing`.
    pub fn is_empty(&self) -> bool {
        self.fields == 0
    }

    /// Executes the UPDATE against `id` and returns the updated row.
    ///
    /// Fails with a validation error before touching the store when no field
    /// was staged, and with not-found when the identifier matches no row.
    pub async fn apply<R>(
        mut self,
        pool: &SqlitePool,
        id: &str,
        resource: &'static str,
    ) -> Result<R, ApiError>
    where
        R: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        if self.is_empty() {
            return Err(ApiError::Validation(
                "No fields provided for update".to_string(),
            ));
        }

        self.qb.push(", updated_at = ").push_bind(Utc::now());
        self.qb.push(" WHERE id = ").push_bind(id.to_owned());
        self.qb.push(" RETURNING *");

        self.qb
            .build_query_as::<R>()
            .fetch_optional(pool)
            .await?
            .ok_or(ApiError::NotFound(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::Field;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default)]
        role: Field<String>,
        #[serde(default)]
        sort_order: Field<i64>,
    }

    #[test]
    fn absent_null_and_value_deserialize_distinctly() {
        let p: Patch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.role.is_missing());
        assert!(p.sort_order.is_missing());

        let p: Patch = serde_json::from_str(r#"{"role": null}"#).unwrap();
        assert_eq!(p.role, Field::Null);
        assert!(p.sort_order.is_missing());

        let p: Patch = serde_json::from_str(r#"{"role": "chair", "sort_order": 3}"#).unwrap();
        assert_eq!(p.role, Field::Value("chair".to_string()));
        assert_eq!(p.sort_order, Field::Value(3));
    }

    #[test]
    fn map_preserves_missing_and_null() {
        assert_eq!(Field::<i64>::Missing.map(|v| v + 1), Field::Missing);
        assert_eq!(Field::<i64>::Null.map(|v| v + 1), Field::Null);
        assert_eq!(Field::Value(1).map(|v| v + 1), Field::Value(2));
    }
}
