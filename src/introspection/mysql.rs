use crate::config::{Dialect, Target};
use crate::error::GeneratorResult;
use crate::introspection::{parse_yes_no, DialectAdapter, IntrospectionQuery, RawColumn, SqlRow};
use crate::types::{ColumnType, SqlType};

// InnoDB table ids grow with each CREATE TABLE, so they keep creation order
// where create_time (one-second resolution) ties.
const COLUMNS_QUERY: &str = "\
SELECT c.table_name,
       c.column_name,
       c.ordinal_position,
       c.column_type,
       c.is_nullable
FROM information_schema.columns c
JOIN information_schema.tables t
  ON t.table_schema = c.table_schema
 AND t.table_name = c.table_name
LEFT JOIN information_schema.innodb_tables it
  ON it.name = CONCAT(c.table_schema, '/', c.table_name)
WHERE c.table_schema = ?
  AND t.table_type = 'BASE TABLE'
ORDER BY it.table_id IS NULL, it.table_id, t.create_time, c.table_name, c.ordinal_position";

/// MySQL column row: the length is embedded in `column_type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub ordinal_position: i64,
    /// Combined type, e.g. `varchar(30)` or `int(10) unsigned`
    pub column_type: String,
    /// `YES` or `NO`
    pub is_nullable: String,
}

/// Introspects MySQL through `information_schema`
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlAdapter;

impl DialectAdapter for MySqlAdapter {
    type Row = MySqlColumnRow;

    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn introspection_query(&self, target: &Target) -> IntrospectionQuery {
        IntrospectionQuery {
            sql: COLUMNS_QUERY,
            params: vec![target.database.clone()],
        }
    }

    fn decode_row(&self, row: &SqlRow) -> GeneratorResult<Self::Row> {
        Ok(MySqlColumnRow {
            table_name: row.text(0, "table_name")?,
            column_name: row.text(1, "column_name")?,
            ordinal_position: row.int(2, "ordinal_position")?,
            column_type: row.text(3, "column_type")?,
            is_nullable: row.text(4, "is_nullable")?,
        })
    }
}

impl RawColumn for MySqlColumnRow {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn column_name(&self) -> &str {
        &self.column_name
    }

    fn ordinal_position(&self) -> i64 {
        self.ordinal_position
    }

    fn column_type(&self) -> ColumnType {
        let (base, length) = split_column_type(&self.column_type);
        ColumnType::new(canonical_type(&base), length)
    }

    fn nullable(&self) -> GeneratorResult<bool> {
        parse_yes_no(
            &self.is_nullable,
            &format!("{}.{}", self.table_name, self.column_name),
        )
    }
}

/// Split `varchar(30)` into (`varchar`, Some(30)); modifiers are dropped
pub fn split_column_type(column_type: &str) -> (String, Option<u32>) {
    let lowered = column_type.trim().to_ascii_lowercase();
    let base_end = lowered.find(['(', ' ']).unwrap_or(lowered.len());
    let base = lowered[..base_end].to_string();

    let length = lowered[base_end..]
        .strip_prefix('(')
        .and_then(|args| args.split_once(')'))
        .and_then(|(args, _)| args.trim().parse::<u32>().ok());

    (base, length)
}

/// Map a MySQL base type name to the canonical vocabulary
pub fn canonical_type(base: &str) -> SqlType {
    match base {
        "int" | "integer" | "mediumint" => SqlType::Int,
        "smallint" => SqlType::SmallInt,
        "tinyint" => SqlType::TinyInt,
        "bigint" => SqlType::BigInt,
        "decimal" | "numeric" => SqlType::Decimal,
        "float" => SqlType::Real,
        "double" | "real" => SqlType::Double,
        "bool" | "boolean" => SqlType::Boolean,
        "char" => SqlType::Char,
        "varchar" => SqlType::Varchar,
        "tinytext" | "text" | "mediumtext" | "longtext" => SqlType::Text,
        "date" => SqlType::Date,
        "time" => SqlType::Time,
        "datetime" => SqlType::DateTime,
        "timestamp" => SqlType::Timestamp,
        "binary" => SqlType::Binary,
        "varbinary" => SqlType::Varbinary,
        "tinyblob" | "blob" | "mediumblob" | "longblob" => SqlType::Blob,
        "json" => SqlType::Json,
        other => SqlType::Other(other.to_string()),
    }
}
