// Generic Table Repository
//
// One repository per table, typed by the row struct. All statements are built
// at runtime from a validated table name, validated column names, and
// parameterized values; no user input is ever spliced into SQL text.
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, PgPool, Postgres};

use crate::database::DatabaseError;
use crate::filter::filter_where::validate_column_name;
use crate::filter::{Filter, FilterData};

/// Typed column value for INSERT/UPDATE statements. JSON covers everything
/// filters can express; timestamps need their native Postgres type.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Json(Value),
    Timestamp(DateTime<Utc>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: PhantomData,
        }
    }

    /// All rows matching the filter, capped at the filter module's document
    /// limit.
    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        let sql = self.build_filter(filter_data)?.to_sql()?;
        let mut query = sqlx::query_as::<_, T>(&sql.query);
        for param in &sql.params {
            query = bind_value_as(query, param);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// First row matching the filter, if any.
    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        let mut filter_data = filter_data;
        filter_data.limit = Some(1);
        let sql = self.build_filter(filter_data)?.to_sql()?;
        let mut query = sqlx::query_as::<_, T>(&sql.query);
        for param in &sql.params {
            query = bind_value_as(query, param);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    /// Like [`select_one`](Self::select_one) but a missing row is an error.
    pub async fn select_404(&self, filter_data: FilterData) -> Result<T, DatabaseError> {
        self.select_one(filter_data)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()))
    }

    /// Insert a row and return it as stored. A unique index violation maps to
    /// [`DatabaseError::Conflict`] so callers can surface it as a client error.
    pub async fn insert_one(&self, fields: Vec<(&str, FieldValue)>) -> Result<T, DatabaseError> {
        for (column, _) in &fields {
            validate_column_name(column).map_err(DatabaseError::from)?;
        }
        let columns: Vec<String> = fields.iter().map(|(c, _)| format!("\"{}\"", c)).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("${}", i)).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            self.table_name,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, T>(&sql);
        for (_, value) in &fields {
            query = bind_field_as(query, value);
        }
        match query.fetch_one(&self.pool).await {
            Ok(row) => Ok(row),
            Err(err) => {
                if is_unique_violation(&err) {
                    return Err(DatabaseError::Conflict(
                        "Duplicate value for unique field".to_string(),
                    ));
                }
                Err(err.into())
            }
        }
    }

    /// Partial update of the first row matching the filter, returning the
    /// updated row. SET values bind first, so the WHERE clause's placeholders
    /// start after them.
    pub async fn update_404(
        &self,
        filter_data: FilterData,
        fields: Vec<(&str, FieldValue)>,
    ) -> Result<T, DatabaseError> {
        if fields.is_empty() {
            return self.select_404(filter_data).await;
        }
        for (column, _) in &fields {
            validate_column_name(column).map_err(DatabaseError::from)?;
        }
        let set_clauses: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("\"{}\" = ${}", column, i + 1))
            .collect();
        let where_sql = self.build_filter(filter_data)?.to_where_sql(fields.len())?;
        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE {} RETURNING *",
            self.table_name,
            set_clauses.join(", "),
            where_sql.query
        );

        let mut query = sqlx::query_as::<_, T>(&sql);
        for (_, value) in &fields {
            query = bind_field_as(query, value);
        }
        for param in &where_sql.params {
            query = bind_value_as(query, param);
        }
        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()))
    }

    /// Delete rows matching the filter; zero rows deleted is an error.
    pub async fn delete_404(&self, filter_data: FilterData) -> Result<(), DatabaseError> {
        let where_sql = self.build_filter(filter_data)?.to_where_sql(0)?;
        let sql = format!("DELETE FROM \"{}\" WHERE {}", self.table_name, where_sql.query);

        let mut query = sqlx::query(&sql);
        for param in &where_sql.params {
            query = bind_value(query, param);
        }
        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Record not found".to_string()));
        }
        Ok(())
    }

    fn build_filter(&self, filter_data: FilterData) -> Result<Filter, DatabaseError> {
        let mut filter = Filter::new(&self.table_name)?;
        filter.assign(filter_data)?;
        Ok(filter)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn bind_field_as<'q, T>(
    query: QueryAs<'q, Postgres, T, PgArguments>,
    value: &FieldValue,
) -> QueryAs<'q, Postgres, T, PgArguments> {
    match value {
        FieldValue::Json(json) => bind_value_as(query, json),
        FieldValue::Timestamp(ts) => query.bind(*ts),
    }
}

/// Bind a JSON value with the Postgres type matching its JSON type. String
/// arrays bind as TEXT[]; objects fall through to JSONB.
fn bind_value_as<'q, T>(
    query: QueryAs<'q, Postgres, T, PgArguments>,
    value: &Value,
) -> QueryAs<'q, Postgres, T, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => query.bind(s.clone()),
        Value::Array(items) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect();
            query.bind(strings)
        }
        Value::Object(_) => query.bind(value.clone()),
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => query.bind(s.clone()),
        Value::Array(items) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect();
            query.bind(strings)
        }
        Value::Object(_) => query.bind(value.clone()),
    }
}
