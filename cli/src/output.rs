//! Output formats for command results

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Table => "table",
        })
    }
}

/// Render any serializable value in the requested format
pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<String, ClientError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Table => Ok(render_table(
            &serde_json::to_value(value)?,
            colored::control::SHOULD_COLORIZE.should_colorize(),
        )),
    }
}

fn render_table(value: &Value, styled: bool) -> String {
    match value {
        Value::Array(rows) => render_rows(rows, styled),
        Value::Object(map) => {
            let mut table = new_table(&["FIELD", "VALUE"], styled);
            for (key, v) in map {
                if v.is_null() || v.is_array() || v.is_object() {
                    continue;
                }
                table.add_row(vec![Cell::new(key), Cell::new(cell(v))]);
            }
            format!("{}\n", table)
        }
        other => format!("{}\n", cell(other)),
    }
}

fn render_rows(rows: &[Value], styled: bool) -> String {
    // Columns: scalar keys in first-seen order
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for (key, v) in map {
                if !(v.is_array() || v.is_object()) && !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    if columns.is_empty() {
        return rows.iter().map(|r| format!("{}\n", cell(r))).collect();
    }

    let header: Vec<String> = columns.iter().map(|c| c.to_uppercase()).collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let mut table = new_table(&header, styled);
    for row in rows {
        table.add_row(
            columns
                .iter()
                .map(|c| Cell::new(row.get(c).map(cell).unwrap_or_default())),
        );
    }
    format!("{}\n", table)
}

fn new_table(header: &[&str], styled: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            header
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    if !styled {
        table.force_no_tty();
    }
    table
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.replace('\n', "\\n"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_cells(line: &str) -> Vec<&str> {
        line.split('│')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    #[test]
    fn test_table_rows_share_columns() {
        let rows = json!([
            {"name": "web", "status": "running", "uuid": "abc", "tags": ["a"]},
            {"name": "worker", "status": null, "uuid": "defgh"},
        ]);
        let table = render_table(&rows, false);
        let lines: Vec<&str> = table.lines().filter(|l| l.contains('│')).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(row_cells(lines[0]), vec!["NAME", "STATUS", "UUID"]);
        assert_eq!(row_cells(lines[1]), vec!["web", "running", "abc"]);
        assert_eq!(row_cells(lines[2]), vec!["worker", "defgh"]);

        // Every row is drawn at the same width
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_table_object_lists_scalar_fields() {
        let value = json!({"uuid": "abc", "description": "line1\nline2", "servers": []});
        let table = render_table(&value, false);
        let lines: Vec<&str> = table.lines().filter(|l| l.contains('│')).collect();
        assert_eq!(row_cells(lines[0]), vec!["FIELD", "VALUE"]);
        assert!(lines.iter().any(|l| row_cells(l) == vec!["description", "line1\\nline2"]));
        assert!(!table.contains("servers"));
    }

    #[test]
    fn test_table_scalar_rows_are_plain() {
        let table = render_table(&json!(["a1", "a2"]), false);
        assert_eq!(table, "a1\na2\n");
    }

    #[test]
    fn test_json_and_yaml() {
        let value = json!({"version": "4.0.0"});
        assert!(render(&value, OutputFormat::Json).unwrap().contains("\"version\": \"4.0.0\""));
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "version: 4.0.0\n");
    }
}
