use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{GeneratorError, GeneratorResult};
use crate::introspection::RawColumn;
use crate::types::{Column, Schema, SqlType, Table};

/// Columns collected for one table before ordering
#[derive(Default)]
struct PendingTable {
    columns: Vec<(i64, Column)>,
    names: HashSet<String>,
    ordinals: HashSet<i64>,
}

/// Build the canonical schema from raw dialect rows
///
/// Tables appear in the order their first row was seen; columns are sorted by
/// ordinal position. Duplicate columns are reported, never merged.
pub fn normalize<R: RawColumn>(rows: &[R]) -> GeneratorResult<Schema> {
    let mut pending: IndexMap<&str, PendingTable> = IndexMap::new();

    for row in rows {
        let table_name = row.table_name();
        let column_name = row.column_name();

        if table_name.trim().is_empty() {
            return Err(GeneratorError::normalization(format!(
                "column {:?} has no table name",
                column_name
            )));
        }
        if column_name.trim().is_empty() {
            return Err(GeneratorError::normalization(format!(
                "table {} has a column without a name",
                table_name
            )));
        }

        let ordinal = row.ordinal_position();
        if ordinal < 1 {
            return Err(GeneratorError::normalization(format!(
                "{}.{} has invalid ordinal position {}",
                table_name, column_name, ordinal
            )));
        }

        let table = pending.entry(table_name).or_default();
        if !table.names.insert(column_name.to_string()) {
            return Err(GeneratorError::normalization(format!(
                "duplicate column {}.{}",
                table_name, column_name
            )));
        }
        if !table.ordinals.insert(ordinal) {
            return Err(GeneratorError::normalization(format!(
                "duplicate ordinal position {} in table {}",
                ordinal, table_name
            )));
        }

        let column_type = row.column_type();
        if let SqlType::Other(native) = &column_type.data_type {
            warn!(
                table = table_name,
                column = column_name,
                "Type {} is outside the canonical vocabulary, passing it through",
                native
            );
        }

        let column = Column::new(column_name, column_type, row.nullable()?);
        table.columns.push((ordinal, column));
    }

    let schema: Schema = pending
        .into_iter()
        .map(|(name, mut table)| {
            table.columns.sort_by_key(|(ordinal, _)| *ordinal);
            debug!("Normalized table {} with {} columns", name, table.columns.len());
            Table::new(name, table.columns.into_iter().map(|(_, column)| column).collect())
        })
        .collect();

    Ok(schema)
}
