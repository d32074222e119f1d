//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use backoffice_core::{FieldErrors, Record};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Spinner on stderr while a request runs. Hidden when quiet or piped.
pub fn spinner(message: impl Into<String>, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(90));
    bar
}

/// Split `KEY=VALUE`, parsing VALUE as JSON when possible so that
/// `sort=3` and `roleIds=[1,2]` keep their types.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), CliError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: raw.into(),
        reason: "expected KEY=VALUE".into(),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: raw.into(),
            reason: "key cannot be empty".into(),
        });
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

/// Read and parse a JSON object file for `--from-file` flags.
pub fn read_json_object(path: &Path) -> Result<Record, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::Validation {
            field: "from-file".into(),
            reason: format!("{} must contain a JSON object", path.display()),
        }),
    }
}

/// One line per field error, for diagnostics.
pub fn describe_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("  {field}: {}", messages.join("; ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop `null` fields so updates leave them untouched.
pub fn without_nulls(record: Record) -> Record {
    record.into_iter().filter(|(_, v)| !v.is_null()).collect()
}
