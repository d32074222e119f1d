// Typed endpoint groups, one module per backend resource.
//
// Every method is an inherent impl on `ApiClient` so callers only ever
// hold one client.

mod auth;
mod categories;
mod files;
mod logs;
mod menus;
mod permissions;
mod posts;
mod roles;
mod users;
