//! Generic list/get/create/update/delete over a [`Resource`].
//!
//! Lists run through a remote `DataTable` (search form + pagination);
//! create and update go through a validated `FormModal`.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use backoffice_api::{ApiClient, Resource, parse_created_from};
use backoffice_core::{
    CoreError, DataTable, Form, FormItem, FormMessage, FormModal, ModalOutcome, PageRequest,
    Record, ResourceSource, SearchConfig, SearchItem, TableData,
};

use crate::cli::{FieldArgs, GlobalOpts, ListArgs, OutputFormat, ResourceCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::{schema, util};

pub async fn handle(
    session: &Session,
    resource: Resource,
    command: ResourceCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        ResourceCommand::List(args) => list(session, resource, &args, global).await,
        ResourceCommand::Get { id } => get(session, resource, id, global).await,
        ResourceCommand::Create(fields) => create(session, resource, &fields, global).await,
        ResourceCommand::Update { id, fields } => update(session, resource, id, &fields, global).await,
        ResourceCommand::Delete { id } => delete(session, resource, id, global).await,
    }
}

/// CLI path of a resource's commands, for help text.
pub fn command_path(resource: Resource) -> &'static str {
    match resource {
        Resource::User => "users",
        Resource::Role => "roles",
        Resource::Permission => "permissions",
        Resource::Post => "posts",
        Resource::Category => "categories",
        Resource::Menu => "menus",
        Resource::Log => "logs",
        Resource::LoginLog => "logs logins",
        Resource::File => "files",
    }
}

fn not_found(resource: Resource, id: u64) -> CliError {
    CliError::NotFound {
        resource_type: resource.to_string(),
        identifier: id.to_string(),
        list_command: format!("{} list", command_path(resource)),
    }
}

// ── List ─────────────────────────────────────────────────────────────

pub async fn list(
    session: &Session,
    resource: Resource,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let table = load_table(session, resource, args, global).await?;
    let out = output::render_records(global.output, table.visible_rows(), schema::columns(resource))?;
    output::print_output(&out, global.quiet);
    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!("{}", output::page_footer(&table.pagination()));
    }
    Ok(())
}

/// Build a remote table for `resource`, apply `--filter` values to its
/// search form and load the requested page.
pub async fn load_table(
    session: &Session,
    resource: Resource,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<DataTable, CliError> {
    let mut source = ResourceSource::new(Arc::clone(&session.client), resource);
    if let Some(ref sort) = args.sort {
        source = source.with_sort(sort.parse()?);
    }
    if let Some(ref created_from) = args.created_from {
        parse_created_from(created_from)?;
        source = source.with_filter("createdFrom", created_from.clone());
    }

    let filters = args
        .filters
        .iter()
        .map(|raw| util::parse_assignment(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut search = schema::search_items(resource);
    for (key, _) in &filters {
        let known = search
            .iter()
            .any(|item| item.field.as_ref().or(item.extend.as_ref()) == Some(key));
        if !known {
            search.push(SearchItem::field(key.clone()));
        }
    }

    let mut table = DataTable::builder(TableData::remote(source))
        .config(session.table_config(args.size))
        .search(SearchConfig::from(search))
        .create(FormModal::new(schema::create_items(resource)))
        .build();

    for (field, value) in filters {
        table.search_update(FormMessage::Change { field, value }).await;
    }

    let spinner = util::spinner(format!("Loading {}", command_path(resource)), global);
    table.load_data(PageRequest::page(args.page)).await;
    spinner.finish_and_clear();

    if let Some(message) = table.last_error() {
        return Err(CliError::ApiError {
            code: None,
            message: message.to_owned(),
        });
    }
    Ok(table)
}

// ── Get ──────────────────────────────────────────────────────────────

async fn fetch_record(client: &ApiClient, resource: Resource, id: u64) -> Result<Record, CliError> {
    match client.get_record(resource, id).await?.data {
        Some(Value::Object(record)) => Ok(record),
        _ => Err(not_found(resource, id)),
    }
}

async fn get(session: &Session, resource: Resource, id: u64, global: &GlobalOpts) -> Result<(), CliError> {
    let record = fetch_record(&session.client, resource, id).await?;
    let out = output::render_record(global.output, &record)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Create / update ──────────────────────────────────────────────────

/// Feed `--from-file` then `--set` values to the form, in that order.
fn apply_fields(form: &mut Form, fields: &FieldArgs) -> Result<(), CliError> {
    if let Some(ref path) = fields.from_file {
        for (field, value) in util::read_json_object(path)? {
            form.update(FormMessage::Change { field, value });
        }
    }
    for raw in &fields.fields {
        let (field, value) = util::parse_assignment(raw)?;
        form.update(FormMessage::Change { field, value });
    }
    Ok(())
}

fn outcome_to_result(outcome: ModalOutcome) -> Result<(), CliError> {
    match outcome {
        ModalOutcome::Submitted => Ok(()),
        ModalOutcome::Invalid(errors) => Err(CliError::InvalidForm {
            details: util::describe_errors(&errors),
        }),
    }
}

async fn create(
    session: &Session,
    resource: Resource,
    fields: &FieldArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut modal = FormModal::new(schema::create_items(resource))
        .with_title(format!("Create {resource}"));
    modal.open(None);
    apply_fields(modal.form_mut(), fields)?;

    let created: Arc<OnceLock<Value>> = Arc::new(OnceLock::new());
    let handler = {
        let client = Arc::clone(&session.client);
        let created = Arc::clone(&created);
        move |model: Record, _items: Vec<FormItem>| {
            let client = Arc::clone(&client);
            let created = Arc::clone(&created);
            async move {
                let body = Value::Object(util::without_nulls(model));
                let envelope = client.create_record(resource, &body).await?;
                if let Some(data) = envelope.data {
                    let _ = created.set(data);
                }
                Ok::<(), CoreError>(())
            }
        }
    };

    outcome_to_result(modal.submit(&handler).await?)?;

    let color = output::should_color(global.color);
    match created.get() {
        Some(Value::Object(record)) => {
            output::print_output(&output::render_record(global.output, record)?, global.quiet);
        }
        Some(id) => {
            if global.output == OutputFormat::Table {
                output::success(&format!("Created {resource} {}", output::cell(id)), color, global.quiet);
            } else {
                output::print_output(&output::cell(id), global.quiet);
            }
        }
        None => output::success(&format!("Created {resource}"), color, global.quiet),
    }
    Ok(())
}

async fn update(
    session: &Session,
    resource: Resource,
    id: u64,
    fields: &FieldArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let row = fetch_record(&session.client, resource, id).await?;
    let mut modal = FormModal::new(schema::modify_items(resource))
        .with_title(format!("Edit {resource} {id}"));
    modal.open(Some(&row));
    apply_fields(modal.form_mut(), fields)?;

    let handler = {
        let client = Arc::clone(&session.client);
        move |model: Record, _items: Vec<FormItem>| {
            let client = Arc::clone(&client);
            async move {
                let body = Value::Object(util::without_nulls(model));
                client.update_record(resource, id, &body).await?;
                Ok::<(), CoreError>(())
            }
        }
    };

    outcome_to_result(modal.submit(&handler).await?)?;
    output::success(
        &format!("Updated {resource} {id}"),
        output::should_color(global.color),
        global.quiet,
    );
    Ok(())
}

// ── Delete ───────────────────────────────────────────────────────────

async fn delete(session: &Session, resource: Resource, id: u64, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(&format!("Delete {resource} {id}?"), "delete", global)? {
        return Ok(());
    }
    session.client.delete_record(resource, id).await?;
    output::success(
        &format!("Deleted {resource} {id}"),
        output::should_color(global.color),
        global.quiet,
    );
    Ok(())
}
