//! Resource-specific commands beyond plain CRUD.

use std::path::Path;

use serde::Serialize;

use backoffice_api::{ListQuery, Menu, Resource};
use backoffice_core::{HISTORY_ENV, HistoryMode, Record};

use crate::cli::{FilesCommand, GlobalOpts, LogsCommand, MenusCommand, OutputFormat, PostsCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::{records, util};

fn to_record<T: Serialize>(value: &T) -> Result<Record, CliError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(CliError::Internal(format!("expected an object, got {other}"))),
    }
}

// ── Posts ────────────────────────────────────────────────────────────

pub async fn posts(session: &Session, command: PostsCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        PostsCommand::Template { out } => {
            let spinner = util::spinner("Downloading template", global);
            let result = session.client.download_post_template().await;
            spinner.finish_and_clear();
            let bytes = result?;
            std::fs::write(&out, &bytes)?;
            output::success(
                &format!("Saved {} bytes to {}", bytes.len(), out.display()),
                output::should_color(global.color),
                global.quiet,
            );
            Ok(())
        }
        PostsCommand::Crud(cmd) => records::handle(session, Resource::Post, cmd, global).await,
    }
}

// ── Menus ────────────────────────────────────────────────────────────

pub async fn menus(session: &Session, command: MenusCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        MenusCommand::Tree => {
            let history = history_mode(session.defaults.history)?;
            let envelope = session.client.get_menus(&ListQuery::new(), true).await?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    let mut lines = Vec::new();
                    render_tree(
                        &envelope.data,
                        0,
                        history,
                        &session.base_url,
                        &mut lines,
                    );
                    lines.join("\n")
                }
                OutputFormat::Json => serde_json::to_string_pretty(&envelope.data)?,
                OutputFormat::JsonCompact => serde_json::to_string(&envelope.data)?,
                OutputFormat::Yaml => serde_yaml::to_string(&envelope.data)
                    .map_err(|e| CliError::Internal(format!("YAML output failed: {e}")))?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
        MenusCommand::Crud(cmd) => records::handle(session, Resource::Menu, cmd, global).await,
    }
}

/// `BACKOFFICE_HISTORY` wins over the configured default when it is set.
fn history_mode(configured: HistoryMode) -> Result<HistoryMode, CliError> {
    if std::env::var_os(HISTORY_ENV).is_none() {
        return Ok(configured);
    }
    Ok(HistoryMode::from_env(HISTORY_ENV)?)
}

/// Indented `name (code) -> link` lines, children under their parent.
fn render_tree(menus: &[Menu], depth: usize, history: HistoryMode, base: &str, lines: &mut Vec<String>) {
    for menu in menus {
        lines.push(format!(
            "{:indent$}{} ({}) -> {}",
            "",
            menu.name,
            menu.code,
            history.href(base, &menu.path),
            indent = depth * 2
        ));
        render_tree(&menu.children, depth + 1, history, base, lines);
    }
}

// ── Logs ─────────────────────────────────────────────────────────────

pub async fn logs(session: &Session, command: LogsCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        LogsCommand::Logins(args) => records::list(session, Resource::LoginLog, &args, global).await,
        LogsCommand::Crud(cmd) => records::handle(session, Resource::Log, cmd, global).await,
    }
}

// ── Files ────────────────────────────────────────────────────────────

pub async fn files(session: &Session, command: FilesCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        FilesCommand::Upload { path, mime } => upload(session, &path, mime.as_deref(), global).await,
        FilesCommand::Hash { hash } => {
            let envelope = session.client.get_file_by_hash(&hash).await?;
            let upload = envelope.data.ok_or_else(|| CliError::NotFound {
                resource_type: "file".into(),
                identifier: hash,
                list_command: "files list".into(),
            })?;
            let out = output::render_record(global.output, &to_record(&upload)?)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        FilesCommand::Crud(cmd) => records::handle(session, Resource::File, cmd, global).await,
    }
}

async fn upload(session: &Session, path: &Path, mime: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::Validation {
            field: "path".into(),
            reason: format!("{} has no usable file name", path.display()),
        })?
        .to_owned();
    let content = std::fs::read(path)?;

    let spinner = util::spinner(format!("Uploading {file_name}"), global);
    let result = session.client.upload_file(&file_name, content, mime).await;
    spinner.finish_and_clear();

    let upload = result?.data.unwrap_or_default();
    let out = output::render_record(global.output, &to_record(&upload)?)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
