use regex::Regex;
use tracing::{debug, warn};

use crate::types::Schema;

/// Whether `name` matches any exclusion pattern
pub fn is_excluded(name: &str, exclude: &[Regex]) -> bool {
    exclude.iter().any(|pattern| pattern.is_match(name))
}

/// Drop every table whose raw name matches one of `exclude`
pub fn filter_tables(schema: Schema, exclude: &[Regex]) -> Schema {
    if exclude.is_empty() {
        return schema;
    }

    let kept: Schema = schema
        .into_iter()
        .filter(|table| {
            let excluded = is_excluded(&table.name, exclude);
            if excluded {
                debug!("Excluding table {}", table.name);
            }
            !excluded
        })
        .collect();

    if kept.is_empty() {
        warn!("Every table matched an exclusion pattern");
    }
    kept
}
