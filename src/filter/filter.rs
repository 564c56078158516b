use serde_json::Value;

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FilterData, SqlResult, MAX_DOCUMENTS};

pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_data: None,
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause {
            self.where_clause(where_clause)?;
        }
        if let Some(limit) = data.limit {
            self.limit(limit, data.offset)?;
        }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn limit(&mut self, limit: i32, offset: Option<i32>) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if let Some(off) = offset {
            if off < 0 {
                return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
            }
        }
        self.limit = Some(limit.min(MAX_DOCUMENTS));
        self.offset = offset;
        Ok(self)
    }

    /// Full SELECT statement. Result sets are always capped at
    /// [`MAX_DOCUMENTS`]; there is no ORDER BY — callers needing a stable
    /// order sort client-side.
    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.where_sql(0)?;
        let limit = self.limit.unwrap_or(MAX_DOCUMENTS);
        let limit_clause = match self.offset {
            Some(o) => format!("LIMIT {} OFFSET {}", limit, o),
            None => format!("LIMIT {}", limit),
        };

        let query = format!(
            "SELECT * FROM \"{}\" WHERE {} {}",
            self.table_name, where_clause, limit_clause
        );
        Ok(SqlResult { query, params })
    }

    /// WHERE predicate only, with bind placeholders starting after
    /// `starting_param_index` already-bound parameters.
    pub fn to_where_sql(&self, starting_param_index: usize) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.where_sql(starting_param_index)?;
        Ok(SqlResult { query: where_clause, params })
    }

    fn where_sql(&self, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        match &self.where_data {
            Some(where_data) => FilterWhere::generate(where_data, starting_param_index),
            None => Ok(("1=1".to_string(), vec![])),
        }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() {
            return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string()));
        }
        let first = name.chars().next().unwrap();
        if (!first.is_alphabetic() && first != '_')
            || !name.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_without_filter_is_capped() {
        let filter = Filter::new("prompti").unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(sql.query, "SELECT * FROM \"prompti\" WHERE 1=1 LIMIT 1000");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn limit_is_capped_at_max_documents() {
        let mut filter = Filter::new("ratings").unwrap();
        filter.limit(5000, None).unwrap();
        let sql = filter.to_sql().unwrap();
        assert!(sql.query.ends_with("LIMIT 1000"));
    }

    #[test]
    fn where_and_limit_compose() {
        let mut filter = Filter::new("prompti").unwrap();
        filter
            .assign(FilterData {
                where_clause: Some(json!({"author_id": "u1"})),
                limit: Some(10),
                offset: Some(20),
            })
            .unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"prompti\" WHERE \"author_id\" = $1 LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![json!("u1")]);
    }

    #[test]
    fn rejects_negative_limit() {
        let mut filter = Filter::new("tags").unwrap();
        assert!(filter.limit(-1, None).is_err());
    }

    #[test]
    fn validates_table_names() {
        assert!(Filter::new("users").is_ok());
        assert!(Filter::new("_internal").is_ok());
        assert!(Filter::new("users; DROP TABLE users").is_err());
        assert!(Filter::new("1users").is_err());
        assert!(Filter::new("").is_err());
    }
}
