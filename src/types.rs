use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::GeneratorResult;

/// Canonical, dialect-independent column type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    /// 32-bit integer
    Int,
    /// 16-bit integer
    SmallInt,
    /// 8-bit integer
    TinyInt,
    /// 64-bit integer
    BigInt,
    /// Exact numeric (decimal, numeric, money)
    Decimal,
    /// Single precision float
    Real,
    /// Double precision float
    Double,
    /// Boolean or bit flag
    Boolean,
    /// Fixed-length character
    Char,
    /// Variable-length character
    Varchar,
    /// Fixed-length national character
    NChar,
    /// Variable-length national character
    NVarchar,
    /// Unbounded text
    Text,
    Date,
    Time,
    /// Date and time without zone
    DateTime,
    /// Date and time, zone-aware where the dialect supports it
    Timestamp,
    Binary,
    Varbinary,
    /// Large binary object
    Blob,
    Uuid,
    Json,
    /// Native type outside the canonical vocabulary, lower-cased
    Other(String),
}

impl SqlType {
    /// Canonical lower-case type name
    pub fn as_str(&self) -> &str {
        match self {
            SqlType::Int => "int",
            SqlType::SmallInt => "smallint",
            SqlType::TinyInt => "tinyint",
            SqlType::BigInt => "bigint",
            SqlType::Decimal => "decimal",
            SqlType::Real => "real",
            SqlType::Double => "double",
            SqlType::Boolean => "boolean",
            SqlType::Char => "char",
            SqlType::Varchar => "varchar",
            SqlType::NChar => "nchar",
            SqlType::NVarchar => "nvarchar",
            SqlType::Text => "text",
            SqlType::Date => "date",
            SqlType::Time => "time",
            SqlType::DateTime => "datetime",
            SqlType::Timestamp => "timestamp",
            SqlType::Binary => "binary",
            SqlType::Varbinary => "varbinary",
            SqlType::Blob => "blob",
            SqlType::Uuid => "uuid",
            SqlType::Json => "json",
            SqlType::Other(name) => name,
        }
    }

    /// Whether a declared length is a character length for this type
    pub fn has_char_length(&self) -> bool {
        matches!(
            self,
            SqlType::Char | SqlType::Varchar | SqlType::NChar | SqlType::NVarchar
        )
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SqlType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Canonical type plus character length, as produced by a dialect row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub data_type: SqlType,
    pub char_length: Option<u32>,
}

impl ColumnType {
    /// Build a column type, keeping the length only for character types
    pub fn new(data_type: SqlType, length: Option<u32>) -> Self {
        let char_length = if data_type.has_char_length() { length } else { None };
        Self { data_type, char_length }
    }
}

/// A column of the canonical schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Raw database identifier
    pub name: String,
    /// Resolved code identifier
    pub property: String,
    /// Canonical type name
    #[serde(rename = "type")]
    pub data_type: SqlType,
    /// Maximum character length, for character types only
    pub char_length: Option<u32>,
    pub nullable: bool,
}

impl Column {
    /// Create a column whose property is the raw name
    pub fn new(name: impl Into<String>, column_type: ColumnType, nullable: bool) -> Self {
        let name = name.into();
        Self {
            property: name.clone(),
            name,
            data_type: column_type.data_type,
            char_length: column_type.char_length,
            nullable,
        }
    }
}

/// A table of the canonical schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Raw database identifier
    pub name: String,
    /// Resolved code identifier used as the export name
    pub property: String,
    /// Columns in ordinal order
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let name = name.into();
        Self {
            property: name.clone(),
            name,
            columns,
        }
    }
}

/// Canonical schema: tables keyed by raw name, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    tables: IndexMap<String, Table>,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in discovery order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.tables.values().map(|table| table.columns.len()).sum()
    }
}

impl FromIterator<Table> for Schema {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self {
            tables: iter
                .into_iter()
                .map(|table| (table.name.clone(), table))
                .collect(),
        }
    }
}

impl IntoIterator for Schema {
    type Item = Table;
    type IntoIter = indexmap::map::IntoValues<String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_values()
    }
}

/// Generated output: one combined buffer, or one buffer per module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Buffer {
    Single(String),
    Modules(IndexMap<String, String>),
}

impl Buffer {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Buffer::Single(text) => Some(text),
            Buffer::Modules(_) => None,
        }
    }

    pub fn as_modules(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Buffer::Single(_) => None,
            Buffer::Modules(modules) => Some(modules),
        }
    }
}

/// Final result of one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Filtered, name-resolved schema
    pub tables: Schema,
    /// Rendered source text
    pub buffer: Buffer,
}

impl GenerationResult {
    /// Serialize the whole result as pretty JSON
    pub fn to_json(&self) -> GeneratorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
