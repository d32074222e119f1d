//! Per-resource table columns, search descriptors and form items.

use serde_json::json;

use backoffice_api::Resource;
use backoffice_core::{FormItem, Rule, SearchItem, Setter};

/// Columns shown by `list` in table output. Empty means "every key of the
/// first row".
pub fn columns(resource: Resource) -> &'static [&'static str] {
    match resource {
        Resource::User => &["id", "username", "nickname", "email", "roleIds", "createdAt"],
        Resource::Role => &["id", "name", "slug", "description"],
        Resource::Permission => &["id", "name", "slug", "type", "description"],
        Resource::Post => &["id", "title", "description", "createdAt"],
        Resource::Category => &["id", "title", "slug", "type", "parentId", "sort"],
        Resource::Menu => &["id", "name", "code", "path", "type", "parentId"],
        Resource::LoginLog => &["id", "nickname", "status", "ip", "addr", "browser", "os", "createdAt"],
        Resource::File => &["id", "name", "mimetype", "size", "hash"],
        Resource::Log => &[],
    }
}

/// Search descriptors, extending the create form's items.
pub fn search_items(resource: Resource) -> Vec<SearchItem> {
    let keys: &[&str] = match resource {
        Resource::User => &["username", "nickname"],
        Resource::Role | Resource::Permission => &["name", "slug"],
        Resource::Post | Resource::Category => &["title"],
        Resource::Menu => &["name", "code"],
        Resource::LoginLog | Resource::File | Resource::Log => &[],
    };
    keys.iter()
        .map(|key| SearchItem {
            enterable: true,
            ..SearchItem::extend(*key)
        })
        .collect()
}

fn required(field: &str, setter: Setter) -> FormItem {
    FormItem::new(field, setter).rule(Rule::required())
}

/// Items of the create dialog.
pub fn create_items(resource: Resource) -> Vec<FormItem> {
    match resource {
        Resource::User => vec![
            required("username", Setter::Input)
                .label("Username")
                .rule(Rule::length(Some(2), Some(32))),
            required("password", Setter::Password)
                .label("Password")
                .rule(Rule::length(Some(6), None)),
            required("nickname", Setter::Input).label("Nickname"),
            FormItem::new("description", Setter::Textarea),
            FormItem::new("avatar", Setter::Upload),
            FormItem::new("roleIds", Setter::Select).setter_prop("mode", json!("multiple")),
        ],
        Resource::Role => vec![
            required("name", Setter::Input).label("Name"),
            required("slug", Setter::Input).label("Slug"),
            FormItem::new("description", Setter::Textarea),
        ],
        Resource::Permission => vec![
            required("name", Setter::Input).label("Name"),
            required("slug", Setter::Input).label("Slug"),
            FormItem::new("type", Setter::Select),
            FormItem::new("description", Setter::Textarea),
        ],
        Resource::Post => vec![
            required("title", Setter::Input).label("Title"),
            FormItem::new("description", Setter::Textarea),
            required("content", Setter::Textarea).label("Content"),
        ],
        Resource::Category => vec![
            required("title", Setter::Input).label("Title"),
            required("slug", Setter::Input).label("Slug"),
            FormItem::new("description", Setter::Textarea),
            FormItem::new("icon", Setter::Input),
            FormItem::new("sort", Setter::InputNumber),
            FormItem::new("type", Setter::Select),
            FormItem::new("parentId", Setter::TreeSelect),
        ],
        Resource::Menu => vec![
            required("name", Setter::Input).label("Name"),
            required("code", Setter::Input).label("Code"),
            required("path", Setter::Input).label("Path"),
            FormItem::new("icon", Setter::Input),
            FormItem::new("type", Setter::Radio).value(json!(0)),
            FormItem::new("parentId", Setter::TreeSelect).value(json!(0)),
        ],
        Resource::Log => vec![required("demo", Setter::Input)],
        Resource::LoginLog | Resource::File => Vec::new(),
    }
}

/// Items of the modify dialog: the create items, with the user password
/// made optional and role permissions editable by id.
pub fn modify_items(resource: Resource) -> Vec<FormItem> {
    let mut items = create_items(resource);
    match resource {
        Resource::User => {
            if let Some(password) = items.iter_mut().find(|item| item.field == "password") {
                password.rules.retain(|rule| !matches!(rule, Rule::Required { .. }));
            }
        }
        Resource::Role => items.push(
            FormItem::new("permissionIds", Setter::Checkbox).setter_prop("mode", json!("multiple")),
        ),
        Resource::File => items.push(FormItem::new("name", Setter::Input).rule(Rule::required())),
        _ => {}
    }
    items
}
