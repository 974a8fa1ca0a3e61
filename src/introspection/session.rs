use std::future::Future;

use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::Client;
use tracing::debug;

use crate::error::{GeneratorError, GeneratorResult};

/// A single value of an introspection result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Positional row returned by a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    fn value(&self, index: usize, field: &str) -> GeneratorResult<&SqlValue> {
        self.values.get(index).ok_or_else(|| {
            GeneratorError::adapter(format!("row has no column {} ({})", index, field))
        })
    }

    /// Required text field; NULL is an error
    pub fn text(&self, index: usize, field: &str) -> GeneratorResult<String> {
        match self.value(index, field)? {
            SqlValue::Text(text) => Ok(text.clone()),
            SqlValue::Null => Err(GeneratorError::adapter(format!("{} is NULL", field))),
            other => Err(GeneratorError::adapter(format!(
                "{} must be text, got {:?}",
                field, other
            ))),
        }
    }

    /// Required integer field
    pub fn int(&self, index: usize, field: &str) -> GeneratorResult<i64> {
        self.opt_int(index, field)?
            .ok_or_else(|| GeneratorError::adapter(format!("{} is NULL", field)))
    }

    /// Nullable integer field
    pub fn opt_int(&self, index: usize, field: &str) -> GeneratorResult<Option<i64>> {
        match self.value(index, field)? {
            SqlValue::Int(value) => Ok(Some(*value)),
            SqlValue::Null => Ok(None),
            other => Err(GeneratorError::adapter(format!(
                "{} must be an integer, got {:?}",
                field, other
            ))),
        }
    }

    /// Required boolean field; integer 0/1 is accepted for bit columns
    pub fn boolean(&self, index: usize, field: &str) -> GeneratorResult<bool> {
        match self.value(index, field)? {
            SqlValue::Bool(value) => Ok(*value),
            SqlValue::Int(0) => Ok(false),
            SqlValue::Int(1) => Ok(true),
            SqlValue::Null => Err(GeneratorError::adapter(format!("{} is NULL", field))),
            other => Err(GeneratorError::adapter(format!(
                "{} must be a boolean, got {:?}",
                field, other
            ))),
        }
    }
}

/// An open connection able to run one introspection query
///
/// Drivers plug in here. The crate ships an implementation for
/// `tokio_postgres::Client`; MySQL and SQL Server drivers implement it on
/// the caller's side. Implementations may use `async fn`; the returned
/// future must be `Send` so generation can run on a spawned task.
pub trait SqlSession {
    /// Run `sql` with positional text parameters and collect every row
    fn query(
        &self,
        sql: &str,
        params: &[&str],
    ) -> impl Future<Output = GeneratorResult<Vec<SqlRow>>> + Send;
}

impl SqlSession for Client {
    async fn query(&self, sql: &str, params: &[&str]) -> GeneratorResult<Vec<SqlRow>> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let rows = Client::query(self, sql, &params).await?;
        debug!("PostgreSQL introspection returned {} rows", rows.len());

        rows.iter().map(decode_postgres_row).collect()
    }
}

fn decode_postgres_row(row: &tokio_postgres::Row) -> GeneratorResult<SqlRow> {
    let mut values = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let value: SqlValue = if *ty == Type::BOOL {
            row.try_get::<_, Option<bool>>(index)?.into()
        } else if *ty == Type::INT2 {
            row.try_get::<_, Option<i16>>(index)?.map(i64::from).into()
        } else if *ty == Type::INT4 {
            row.try_get::<_, Option<i32>>(index)?.map(i64::from).into()
        } else if *ty == Type::INT8 {
            row.try_get::<_, Option<i64>>(index)?.into()
        } else if [Type::TEXT, Type::VARCHAR, Type::NAME, Type::BPCHAR].contains(ty) {
            row.try_get::<_, Option<String>>(index)?.into()
        } else {
            return Err(GeneratorError::adapter(format!(
                "unsupported column type {} for {}",
                ty,
                column.name()
            )));
        };
        values.push(value);
    }
    Ok(SqlRow::new(values))
}
