// Dialect adapters: introspection queries and raw row decoding
pub mod mssql;
pub mod mysql;
pub mod postgres;
pub mod session;

pub use mssql::{MsSqlAdapter, MsSqlColumnRow};
pub use mysql::{MySqlAdapter, MySqlColumnRow};
pub use postgres::{PostgresAdapter, PostgresColumnRow};
pub use session::{SqlRow, SqlSession, SqlValue};

use tracing::{debug, info};

use crate::config::{Dialect, Target};
use crate::error::{GeneratorError, GeneratorResult};
use crate::types::ColumnType;

/// Uniform view of one raw column row, whatever dialect produced it
pub trait RawColumn {
    fn table_name(&self) -> &str;
    fn column_name(&self) -> &str;
    /// 1-based declared position of the column
    fn ordinal_position(&self) -> i64;
    /// Canonical type and character length
    fn column_type(&self) -> ColumnType;
    /// Strict nullability; unrecognized flags are errors
    fn nullable(&self) -> GeneratorResult<bool>;
}

/// Introspection statement plus its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionQuery {
    pub sql: &'static str,
    pub params: Vec<String>,
}

/// One database family's introspection strategy
pub trait DialectAdapter {
    type Row: RawColumn;

    fn dialect(&self) -> Dialect;

    /// Statement listing every column of every base table in `target`
    fn introspection_query(&self, target: &Target) -> IntrospectionQuery;

    /// Decode one result row into the dialect's raw row shape
    fn decode_row(&self, row: &SqlRow) -> GeneratorResult<Self::Row>;
}

/// Run the adapter's query on `session` and decode every row
///
/// An empty result is reported rather than turned into an empty schema.
pub async fn fetch_rows<A, S>(
    adapter: &A,
    session: &S,
    target: &Target,
) -> GeneratorResult<Vec<A::Row>>
where
    A: DialectAdapter,
    S: SqlSession,
{
    let query = adapter.introspection_query(target);
    info!(
        dialect = %adapter.dialect(),
        database = %target.database,
        schema = ?target.schema,
        "Introspecting columns"
    );
    debug!("Introspection query: {}", query.sql);

    let params: Vec<&str> = query.params.iter().map(String::as_str).collect();
    let rows = session.query(query.sql, &params).await?;
    if rows.is_empty() {
        return Err(GeneratorError::empty_schema(target.qualifier()));
    }

    rows.iter().map(|row| adapter.decode_row(row)).collect()
}

/// Parse an information_schema `YES`/`NO` flag
pub(crate) fn parse_yes_no(flag: &str, context: &str) -> GeneratorResult<bool> {
    match flag.trim().to_ascii_uppercase().as_str() {
        "YES" => Ok(true),
        "NO" => Ok(false),
        other => Err(GeneratorError::normalization(format!(
            "unrecognized nullability flag {:?} for {}",
            other, context
        ))),
    }
}

/// Declared length as a character length; negative sentinels (e.g. `max`) become None
pub(crate) fn declared_length(length: Option<i64>) -> Option<u32> {
    length.and_then(|len| u32::try_from(len).ok())
}
