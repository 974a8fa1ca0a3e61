use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::config::EmitOptions;
use crate::error::{GeneratorError, GeneratorResult};
use crate::types::{Buffer, Column, Schema, Table};

/// Module name of the aggregating buffer under modularization
pub const INDEX_MODULE: &str = "index";

const BANNER_PREFIX: &str = concat!("// autogenerated by ", env!("CARGO_PKG_NAME"), " v");

/// Accumulates indented lines; line endings are applied once, at the end
struct CodeWriter<'a> {
    indent: &'a str,
    lines: Vec<String>,
}

impl<'a> CodeWriter<'a> {
    fn new(indent: &'a str) -> Self {
        Self {
            indent,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, level: usize, text: impl AsRef<str>) {
        let mut line = self.indent.repeat(level);
        line.push_str(text.as_ref());
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self, eol: &str) -> String {
        let mut output = self.lines.join(eol);
        output.push_str(eol);
        output
    }
}

/// Renders a schema as `sql.define()` definitions
pub struct Emitter<'a> {
    options: &'a EmitOptions,
    /// Schema or database name used by `include_schema`
    qualifier: &'a str,
    generated_at: DateTime<Utc>,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a EmitOptions, qualifier: &'a str, generated_at: DateTime<Utc>) -> Self {
        Self {
            options,
            qualifier,
            generated_at,
        }
    }

    /// Render `schema` into one buffer, or one per table plus an index
    pub fn render(&self, schema: &Schema) -> GeneratorResult<Buffer> {
        if self.options.modularize {
            self.render_modules(schema).map(Buffer::Modules)
        } else {
            Ok(Buffer::Single(self.render_combined(schema)))
        }
    }

    /// The single-line generation banner
    pub fn banner(&self) -> String {
        format!(
            "{}{} on {}",
            BANNER_PREFIX,
            env!("CARGO_PKG_VERSION"),
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    fn render_combined(&self, schema: &Schema) -> String {
        let mut writer = CodeWriter::new(&self.options.indent);
        self.write_header(&mut writer);
        writer.line(0, "var sql = require('sql');");
        for table in schema.tables() {
            writer.blank();
            self.write_definition(&mut writer, table, &format!("exports.{}", table.property));
        }
        self.write_footer(&mut writer);
        writer.finish(&self.options.eol)
    }

    fn render_modules(&self, schema: &Schema) -> GeneratorResult<IndexMap<String, String>> {
        let mut modules = IndexMap::new();

        for table in schema.tables() {
            if table.property == INDEX_MODULE {
                return Err(GeneratorError::name_collision(format!(
                    "table {} cannot be modularized: its property clashes with the {} module",
                    table.name, INDEX_MODULE
                )));
            }

            let mut writer = CodeWriter::new(&self.options.indent);
            self.write_header(&mut writer);
            writer.line(0, "var sql = require('sql');");
            writer.blank();
            self.write_definition(&mut writer, table, "module.exports");
            self.write_footer(&mut writer);

            debug!("Rendered module {}", table.property);
            modules.insert(table.property.clone(), writer.finish(&self.options.eol));
        }

        modules.insert(INDEX_MODULE.to_string(), self.render_index(schema));
        Ok(modules)
    }

    fn render_index(&self, schema: &Schema) -> String {
        let mut writer = CodeWriter::new(&self.options.indent);
        self.write_header(&mut writer);
        writer.line(0, "module.exports = {");
        let count = schema.len();
        for (position, table) in schema.tables().enumerate() {
            let separator = if position + 1 < count { "," } else { "" };
            writer.line(
                1,
                format!(
                    "{}: require({}){}",
                    table.property,
                    quote(&format!("./{}", table.property)),
                    separator
                ),
            );
        }
        writer.line(0, "};");
        self.write_footer(&mut writer);
        writer.finish(&self.options.eol)
    }

    fn write_header(&self, writer: &mut CodeWriter<'_>) {
        if !self.options.omit_comments {
            writer.line(0, self.banner());
        }
        if let Some(prepend) = &self.options.prepend {
            writer.line(0, prepend);
        }
    }

    fn write_footer(&self, writer: &mut CodeWriter<'_>) {
        if let Some(append) = &self.options.append {
            writer.line(0, append);
        }
    }

    fn write_definition(&self, writer: &mut CodeWriter<'_>, table: &Table, binding: &str) {
        if !self.options.omit_comments {
            writer.line(0, "/**");
            writer.line(0, format!(" * SQL definition for {}", self.display_name(table)));
            writer.line(0, " */");
        }
        writer.line(0, format!("{} = sql.define({{", binding));
        writer.line(1, format!("name: {},", quote(&table.name)));
        if self.options.include_schema {
            writer.line(1, format!("schema: {},", quote(self.qualifier)));
        }
        writer.line(1, "columns: [");
        let count = table.columns.len();
        for (position, column) in table.columns.iter().enumerate() {
            let separator = if position + 1 < count { "," } else { "" };
            writer.line(2, format!("{{ {} }}{}", self.column_fields(column), separator));
        }
        writer.line(1, "]");
        writer.line(0, "});");
    }

    fn display_name(&self, table: &Table) -> String {
        if self.options.include_schema {
            format!("{}.{}", self.qualifier, table.name)
        } else {
            table.name.clone()
        }
    }

    fn column_fields(&self, column: &Column) -> String {
        let mut fields = format!(
            "name: {}, property: {}",
            quote(&column.name),
            quote(&column.property)
        );
        if self.options.include_meta {
            let char_length = column
                .char_length
                .map_or_else(|| "null".to_string(), |len| len.to_string());
            fields.push_str(&format!(
                ", type: {}, charLength: {}, nullable: {}",
                quote(column.data_type.as_str()),
                char_length,
                column.nullable
            ));
        }
        fields
    }
}

/// Single-quoted JavaScript string literal
fn quote(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            other => literal.push(other),
        }
    }
    literal.push('\'');
    literal
}

/// Remove the leading generation banner line, e.g. before comparing with a fixture
pub fn strip_banner(output: &str) -> String {
    if !output.starts_with(BANNER_PREFIX) {
        return output.to_string();
    }
    match output.find('\n') {
        Some(newline) => output[newline + 1..].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnType, SqlType};
    use chrono::TimeZone;

    fn schema() -> Schema {
        vec![Table::new(
            "it's",
            vec![Column::new("a\\b", ColumnType::new(SqlType::Text, None), true)],
        )]
        .into_iter()
        .collect()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_banner_format() {
        let options = EmitOptions::default();
        let emitter = Emitter::new(&options, "db", at());
        assert_eq!(
            emitter.banner(),
            format!(
                "// autogenerated by schemagen v{} on 2026-10-16T12:00:00Z",
                env!("CARGO_PKG_VERSION")
            )
        );
    }

    #[test]
    fn test_string_literals_are_escaped() {
        let options = EmitOptions {
            omit_comments: true,
            ..EmitOptions::default()
        };
        let buffer = Emitter::new(&options, "db", at()).render(&schema()).unwrap();
        let text = buffer.as_single().unwrap();
        assert!(text.contains("name: 'it\\'s',"));
        assert!(text.contains("{ name: 'a\\\\b', property: 'a\\\\b' }"));
    }

    #[test]
    fn test_index_module_collision() {
        let schema: Schema = vec![Table {
            name: "index".to_string(),
            property: "index".to_string(),
            columns: vec![Column::new("id", ColumnType::new(SqlType::Int, None), false)],
        }]
        .into_iter()
        .collect();
        let options = EmitOptions {
            modularize: true,
            ..EmitOptions::default()
        };
        let err = Emitter::new(&options, "db", at()).render(&schema).unwrap_err();
        assert!(matches!(err, GeneratorError::NameCollision { .. }));
    }

    #[test]
    fn test_strip_banner() {
        assert_eq!(
            strip_banner("// autogenerated by schemagen v0.1.0 on now\r\nvar sql;\r\n"),
            "var sql;\r\n"
        );
        assert_eq!(strip_banner("var sql;\n"), "var sql;\n");
    }

    #[test]
    fn test_strip_banner_keeps_prepended_text() {
        let options = EmitOptions {
            omit_comments: true,
            prepend: Some("// autogenerated by hand".to_string()),
            ..EmitOptions::default()
        };
        let buffer = Emitter::new(&options, "db", at()).render(&schema()).unwrap();
        let text = buffer.as_single().unwrap();
        assert_eq!(strip_banner(text), text);

        let options = EmitOptions {
            prepend: Some("// autogenerated by hand".to_string()),
            ..EmitOptions::default()
        };
        let buffer = Emitter::new(&options, "db", at()).render(&schema()).unwrap();
        assert!(strip_banner(buffer.as_single().unwrap()).starts_with("// autogenerated by hand\n"));
    }

    #[test]
    fn test_same_input_same_output() {
        let options = EmitOptions::default();
        let first = Emitter::new(&options, "db", at()).render(&schema()).unwrap();
        let second = Emitter::new(&options, "db", at()).render(&schema()).unwrap();
        assert_eq!(first, second);
    }
}
