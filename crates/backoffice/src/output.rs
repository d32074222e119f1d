//! Output formatting: table, JSON, YAML, plain.
//!
//! Records are loosely-typed JSON objects, so tables are built column by
//! column with `tabled`'s builder instead of a `Tabled` derive.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use backoffice_core::{Pagination, Record};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Print a success line to stderr.
pub fn success(message: &str, color: bool, quiet: bool) {
    if quiet {
        return;
    }
    if color {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("✓ {message}");
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a page of records. `columns` picks the table columns; an empty
/// slice falls back to the keys of the first row.
pub fn render_records(
    format: OutputFormat,
    rows: &[Record],
    columns: &[&str],
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(rows, columns)),
        OutputFormat::Json => render_json(rows, false),
        OutputFormat::JsonCompact => render_json(rows, true),
        OutputFormat::Yaml => render_yaml(rows),
        OutputFormat::Plain => Ok(rows
            .iter()
            .filter_map(|row| row.get("id").map(cell))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render one record; tables become a `key: value` listing.
pub fn render_record(format: OutputFormat, record: &Record) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_detail(record)),
        OutputFormat::Json => render_json(record, false),
        OutputFormat::JsonCompact => render_json(record, true),
        OutputFormat::Yaml => render_yaml(record),
        OutputFormat::Plain => Ok(record.get("id").map(cell).unwrap_or_default()),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// "page 2/5, 47 total" footer for table output.
pub fn page_footer(pagination: &Pagination) -> String {
    let size = u64::from(pagination.page_size.max(1));
    let pages = pagination.total.div_ceil(size).max(1);
    format!(
        "page {}/{pages}, {} total",
        pagination.current, pagination.total
    )
}

// ── Format-specific renderers ────────────────────────────────────────

/// Table cell text for a JSON value.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn render_table(rows: &[Record], columns: &[&str]) -> String {
    let headers: Vec<String> = if columns.is_empty() {
        rows.first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        columns.iter().map(|c| (*c).to_owned()).collect()
    };

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        builder.push_record(
            headers
                .iter()
                .map(|key| row.get(key).map(cell).unwrap_or_default()),
        );
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn render_detail(record: &Record) -> String {
    let width = record.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    record
        .iter()
        .map(|(key, value)| format!("{key:>width$}: {}", cell(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Internal(format!("YAML output failed: {e}")))
}
