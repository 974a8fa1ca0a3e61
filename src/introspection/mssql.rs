use crate::config::{Dialect, Target};
use crate::error::GeneratorResult;
use crate::introspection::{declared_length, DialectAdapter, IntrospectionQuery, RawColumn, SqlRow};
use crate::types::{ColumnType, SqlType};

// Tables are ordered by object id, which follows creation order.
const COLUMNS_QUERY: &str = "\
SELECT c.TABLE_NAME,
       c.COLUMN_NAME,
       c.ORDINAL_POSITION,
       c.DATA_TYPE,
       c.CHARACTER_MAXIMUM_LENGTH,
       CAST(CASE WHEN c.IS_NULLABLE = 'YES' THEN 1 ELSE 0 END AS bit) AS IS_NULLABLE
FROM INFORMATION_SCHEMA.COLUMNS c
JOIN INFORMATION_SCHEMA.TABLES t
  ON t.TABLE_CATALOG = c.TABLE_CATALOG
 AND t.TABLE_SCHEMA = c.TABLE_SCHEMA
 AND t.TABLE_NAME = c.TABLE_NAME
WHERE c.TABLE_CATALOG = @P1
  AND c.TABLE_SCHEMA = @P2
  AND t.TABLE_TYPE = 'BASE TABLE'
ORDER BY OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME)), c.ORDINAL_POSITION";

/// SQL Server column row: separate length (`-1` for `max`), bit nullability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsSqlColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub ordinal_position: i64,
    pub data_type: String,
    pub character_maximum_length: Option<i64>,
    pub is_nullable: bool,
}

/// Introspects SQL Server through `INFORMATION_SCHEMA`
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlAdapter;

impl DialectAdapter for MsSqlAdapter {
    type Row = MsSqlColumnRow;

    fn dialect(&self) -> Dialect {
        Dialect::MsSql
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
        Ok(MsSqlColumnRow {
            table_name: row.text(0, "TABLE_NAME")?,
            column_name: row.text(1, "COLUMN_NAME")?,
            ordinal_position: row.int(2, "ORDINAL_POSITION")?,
            data_type: row.text(3, "DATA_TYPE")?,
            character_maximum_length: row.opt_int(4, "CHARACTER_MAXIMUM_LENGTH")?,
            is_nullable: row.boolean(5, "IS_NULLABLE")?,
        })
    }
}

impl RawColumn for MsSqlColumnRow {
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
            canonical_type(&self.data_type),
            declared_length(self.character_maximum_length),
        )
    }

    fn nullable(&self) -> GeneratorResult<bool> {
        Ok(self.is_nullable)
    }
}

/// Map a SQL Server `DATA_TYPE` to the canonical vocabulary
pub fn canonical_type(data_type: &str) -> SqlType {
    let name = data_type.trim().to_ascii_lowercase();
    match name.as_str() {
        "int" => SqlType::Int,
        "smallint" => SqlType::SmallInt,
        "tinyint" => SqlType::TinyInt,
        "bigint" => SqlType::BigInt,
        "decimal" | "numeric" | "money" | "smallmoney" => SqlType::Decimal,
        "real" => SqlType::Real,
        "float" => SqlType::Double,
        "bit" => SqlType::Boolean,
        "char" => SqlType::Char,
        "varchar" => SqlType::Varchar,
        "nchar" => SqlType::NChar,
        "nvarchar" => SqlType::NVarchar,
        "text" | "ntext" => SqlType::Text,
        "date" => SqlType::Date,
        "time" => SqlType::Time,
        "datetime" | "datetime2" | "smalldatetime" => SqlType::DateTime,
        "datetimeoffset" => SqlType::Timestamp,
        "binary" => SqlType::Binary,
        "varbinary" => SqlType::Varbinary,
        "image" => SqlType::Blob,
        "uniqueidentifier" => SqlType::Uuid,
        _ => SqlType::Other(name),
    }
}
