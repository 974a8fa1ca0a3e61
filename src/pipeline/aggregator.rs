use tracing::info;

use crate::types::{Buffer, GenerationResult, Schema};

/// Combine the resolved schema and rendered output into the final result
pub fn aggregate(tables: Schema, buffer: Buffer) -> GenerationResult {
    let (modules, bytes) = match &buffer {
        Buffer::Single(text) => (1, text.len()),
        Buffer::Modules(modules) => (modules.len(), modules.values().map(String::len).sum()),
    };
    info!(
        tables = tables.len(),
        columns = tables.column_count(),
        modules,
        bytes,
        "Generation complete"
    );

    GenerationResult { tables, buffer }
}
