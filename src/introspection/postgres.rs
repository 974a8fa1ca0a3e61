use crate::config::{Dialect, Target};
use crate::error::GeneratorResult;
use crate::introspection::{
    declared_length, parse_yes_no, DialectAdapter, IntrospectionQuery, RawColumn, SqlRow,
};
use crate::types::{ColumnType, SqlType};

// Tables are ordered by oid so discovery order follows creation order.
const COLUMNS_QUERY: &str = "\
SELECT c.table_name::text,
       c.column_name::text,
       c.ordinal_position::int4,
       c.udt_name::text,
       c.character_maximum_length::int4,
       c.is_nullable::text
FROM information_schema.columns c
JOIN information_schema.tables t
  ON t.table_catalog = c.table_catalog
 AND t.table_schema = c.table_schema
 AND t.table_name = c.table_name
WHERE c.table_catalog = $1::text
  AND c.table_schema = $2::text
  AND t.table_type = 'BASE TABLE'
ORDER BY (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass::oid,
         c.ordinal_position";

/// PostgreSQL column row: type by `udt_name`, length as a separate field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub ordinal_position: i64,
    /// Internal type name, e.g. `int4`, `varchar`, `bpchar`
    pub udt_name: String,
    pub character_maximum_length: Option<i64>,
    /// `YES` or `NO`
    pub is_nullable: String,
}

/// Introspects PostgreSQL through `information_schema`
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresAdapter;

impl DialectAdapter for PostgresAdapter {
    type Row = PostgresColumnRow;

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn introspection_query(&self, target: &Target) -> IntrospectionQuery {
        IntrospectionQuery {
            sql: COLUMNS_QUERY,
            params: vec![
                target.database.clone(),
                target.qualifier().to_string(),
            ],
        }
    }

    fn decode_row(&self, row: &SqlRow) -> GeneratorResult<Self::Row> {
        Ok(PostgresColumnRow {
            table_name: row.text(0, "table_name")?,
            column_name: row.text(1, "column_name")?,
            ordinal_position: row.int(2, "ordinal_position")?,
            udt_name: row.text(3, "udt_name")?,
            character_maximum_length: row.opt_int(4, "character_maximum_length")?,
            is_nullable: row.text(5, "is_nullable")?,
        })
    }
}

impl RawColumn for PostgresColumnRow {
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
        ColumnType::new(
            canonical_type(&self.udt_name),
            declared_length(self.character_maximum_length),
        )
    }

    fn nullable(&self) -> GeneratorResult<bool> {
        parse_yes_no(
            &self.is_nullable,
            &format!("{}.{}", self.table_name, self.column_name),
        )
    }
}

/// Map a PostgreSQL `udt_name` to the canonical vocabulary
pub fn canonical_type(udt_name: &str) -> SqlType {
    let name = udt_name.trim().to_ascii_lowercase();
    match name.as_str() {
        "int4" | "integer" => SqlType::Int,
        "int2" | "smallint" => SqlType::SmallInt,
        "int8" | "bigint" => SqlType::BigInt,
        "numeric" | "money" => SqlType::Decimal,
        "float4" => SqlType::Real,
        "float8" => SqlType::Double,
        "bool" => SqlType::Boolean,
        "bpchar" | "char" => SqlType::Char,
        "varchar" => SqlType::Varchar,
        "text" | "citext" => SqlType::Text,
        "date" => SqlType::Date,
        "time" | "timetz" => SqlType::Time,
        "timestamp" => SqlType::DateTime,
        "timestamptz" => SqlType::Timestamp,
        "bytea" => SqlType::Blob,
        "uuid" => SqlType::Uuid,
        "json" | "jsonb" => SqlType::Json,
        _ => SqlType::Other(name),
    }
}
