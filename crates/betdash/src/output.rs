//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use betdash_core::{CONNECTED_MARKER, DISCONNECTED_MARKER};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Whether a log line is one of the store's status markers rather than
/// backend output.
pub fn is_marker(line: &str) -> bool {
    line == CONNECTED_MARKER || line == DISCONNECTED_MARKER || line.starts_with("[Error: ")
}

/// Paint status markers; backend lines pass through untouched.
pub fn paint_log_line(line: &str, color: bool) -> String {
    if !color {
        return line.to_owned();
    }
    if line == CONNECTED_MARKER {
        line.green().to_string()
    } else if line == DISCONNECTED_MARKER {
        line.yellow().to_string()
    } else if line.starts_with("[Error: ") {
        line.red().to_string()
    } else {
        line.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false)?,
        OutputFormat::JsonCompact => render_json(data, true)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single items don't use `Tabled`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false)?,
        OutputFormat::JsonCompact => render_json(data, true)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Render an untyped backend payload.
///
/// Arrays of objects become one row per element with the union of their keys
/// as columns; a single object becomes a key/value table.
pub fn render_value(format: &OutputFormat, value: &Value) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => render_value_table(value),
        OutputFormat::Json => render_json(value, false)?,
        OutputFormat::JsonCompact => render_json(value, true)?,
        OutputFormat::Plain => match value {
            Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join("\n"),
            other => cell(other),
        },
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_value_table(value: &Value) -> String {
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            let mut columns: Vec<&str> = Vec::new();
            for item in items.iter().filter_map(Value::as_object) {
                for key in item.keys() {
                    if !columns.contains(&key.as_str()) {
                        columns.push(key);
                    }
                }
            }

            let mut builder = Builder::default();
            builder.push_record(columns.iter().map(|col| (*col).to_owned()));
            for item in items.iter().filter_map(Value::as_object) {
                builder.push_record(
                    columns
                        .iter()
                        .map(|col| item.get(*col).map(cell).unwrap_or_default()),
                );
            }
            builder.build().with(Style::rounded()).to_string()
        }
        Value::Object(map) => {
            let mut builder = Builder::default();
            for (key, val) in map {
                builder.push_record([key.clone(), cell(val)]);
            }
            builder.build().with(Style::rounded()).to_string()
        }
        Value::Array(items) if items.is_empty() => "(no entries)".into(),
        other => cell(other),
    }
}

/// One table cell: strings unquoted, everything else as compact JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let text = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn markers_are_recognised() {
        assert!(is_marker(CONNECTED_MARKER));
        assert!(is_marker(DISCONNECTED_MARKER));
        assert!(is_marker("[Error: refused]"));
        assert!(!is_marker("placed bet on Lakers"));
    }

    #[test]
    fn uncolored_lines_are_unchanged() {
        assert_eq!(paint_log_line(CONNECTED_MARKER, false), CONNECTED_MARKER);
    }

    #[test]
    fn array_of_objects_becomes_columns() {
        let value = json!([
            {"team": "Lakers", "wins": 3},
            {"team": "Celtics", "losses": 1}
        ]);
        let table = render_value(&OutputFormat::Table, &value).unwrap();
        for needle in ["team", "wins", "losses", "Lakers", "Celtics"] {
            assert!(table.contains(needle), "missing {needle} in\n{table}");
        }
    }

    #[test]
    fn plain_prints_one_item_per_line() {
        let value = json!(["a", "b"]);
        assert_eq!(render_value(&OutputFormat::Plain, &value).unwrap(), "a\nb");
    }

    #[test]
    fn empty_array_table() {
        assert_eq!(
            render_value(&OutputFormat::Table, &json!([])).unwrap(),
            "(no entries)"
        );
    }
}
