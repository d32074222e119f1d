// Wire types for the admin REST API.
//
// Every response is wrapped in `{ code, message, data? }`. List endpoints
// add a sibling `total` used by paged tables. Field names are camelCase on
// the wire.

use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// Standard response envelope: `{ code, message, data? }`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Envelope<T> {
    /// Status code (the backend uses 2000 for success).
    pub code: i64,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Consume the envelope and return its payload, if any.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Envelope of a paged list endpoint: `{ code, message, data: [], total }`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ListEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Total matching rows across all pages.
    #[serde(default)]
    pub total: u64,
}

/// Bare `{ code, message }` acknowledgement (update / delete responses).
pub type Ack = Envelope<serde_json::Value>;

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ids: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: Option<u64>,
    pub username: String,
    pub nickname: String,
    pub description: String,
    pub avatar: String,
    pub email: String,
    pub role_ids: Vec<u64>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ids: Option<Vec<u64>>,
}

// ── Roles & permissions ──────────────────────────────────────────────

/// Whether a permission guards a menu entry or an API route.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    #[default]
    Menu,
    Api,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Permission {
    pub id: Option<u64>,
    pub name: String,
    /// Permission slug, e.g. `post:list`.
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: PermissionType,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionDto {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub id: Option<u64>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleDto {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuthUserDto {
    pub username: String,
    pub password: String,
}

/// Profile of the logged-in user, including the bearer token.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginedUserVo {
    pub id: u64,
    pub token: String,
    pub username: String,
    pub nickname: String,
    pub description: String,
    pub avatar: String,
    pub email: String,
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CreateLogDto {
    pub demo: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct UpdateLogDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginLog {
    pub id: Option<u64>,
    pub nickname: String,
    pub description: String,
    /// `true` when the login attempt succeeded.
    pub status: bool,
    pub ip: String,
    pub addr: String,
    pub browser: String,
    pub os: String,
    pub created_at: Option<String>,
}

// ── Files ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Upload {
    pub id: Option<u64>,
    pub name: String,
    pub size: u64,
    pub mimetype: String,
    pub path: String,
    pub hash: String,
    pub extension: String,
}

// ── Posts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CreatePostDto {
    pub title: String,
    pub description: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: Option<User>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct UpdatePostDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    /// Free-form category type object.
    #[serde(rename = "type")]
    pub kind: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: Option<u64>,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<serde_json::Value>,
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

// ── Menus ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuDto {
    pub parent_id: u64,
    pub name: String,
    pub code: String,
    pub path: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Menu {
    pub id: Option<u64>,
    pub name: String,
    pub code: String,
    pub path: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: i64,
    pub parent_id: u64,
    /// Present when the list was requested with `tree=true`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Menu>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
}
