use std::collections::HashSet;
use tracing::debug;

use crate::error::{GeneratorError, GeneratorResult};
use crate::types::{Column, Schema, Table};

/// Words that cannot be used as bare identifiers in generated JavaScript
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// How raw identifiers become properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Raw name as-is, made identifier-safe if needed
    #[default]
    Verbatim,
    /// `foo_bar_baz` becomes `fooBarBaz`
    Camelize,
}

impl NamingPolicy {
    /// Property identifier for a raw name
    pub fn property_for(&self, raw: &str) -> String {
        match self {
            NamingPolicy::Verbatim => sanitize_identifier(raw),
            NamingPolicy::Camelize => sanitize_identifier(&camelize(raw)),
        }
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Split on separators and on lower/digit to upper case boundaries
fn segments(name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for ch in name.chars() {
        if ch == '_' || ch == '$' || !is_identifier_char(ch) {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        let boundary = ch.is_uppercase()
            && previous.is_some_and(|p| p.is_lowercase() || p.is_numeric());
        if boundary && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        current.push(ch);
        previous = Some(ch);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Camel-case an identifier; single-segment names are returned unchanged
///
/// `foo_bar_baz` → `fooBarBaz`, `field_1` → `field1`, `USER_ID` → `userID`.
/// Applying it to its own output is a no-op.
pub fn camelize(name: &str) -> String {
    let segments = segments(name);
    if segments.len() <= 1 {
        return name.to_string();
    }

    let mut result = segments[0].to_lowercase();
    for segment in &segments[1..] {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Make a name usable as a bare identifier; legal names are unchanged
pub fn sanitize_identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|ch| if is_identifier_char(ch) { ch } else { '_' })
        .collect();

    if identifier.is_empty() {
        return "_".to_string();
    }
    if identifier.starts_with(|ch: char| ch.is_numeric()) {
        identifier.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&identifier.as_str()) {
        identifier.push('_');
    }
    identifier
}

/// Assign a property to every table and column of `schema`
///
/// Two tables, or two columns of one table, resolving to the same property
/// is an error.
pub fn resolve_names(schema: Schema, policy: NamingPolicy) -> GeneratorResult<Schema> {
    let mut table_properties = HashSet::new();

    schema
        .into_iter()
        .map(|table| {
            let property = policy.property_for(&table.name);
            if !table_properties.insert(property.clone()) {
                return Err(GeneratorError::name_collision(format!(
                    "table {} resolves to property {} which is already taken",
                    table.name, property
                )));
            }
            let columns = resolve_columns(&table.name, table.columns, policy)?;
            debug!("Resolved table {} as {}", table.name, property);
            Ok(Table {
                name: table.name,
                property,
                columns,
            })
        })
        .collect()
}

fn resolve_columns(
    table: &str,
    columns: Vec<Column>,
    policy: NamingPolicy,
) -> GeneratorResult<Vec<Column>> {
    let mut seen = HashSet::new();
    columns
        .into_iter()
        .map(|column| {
            let property = policy.property_for(&column.name);
            if !seen.insert(property.clone()) {
                return Err(GeneratorError::name_collision(format!(
                    "column {}.{} resolves to property {} which is already taken",
                    table, column.name, property
                )));
            }
            Ok(Column { property, ..column })
        })
        .collect()
}
