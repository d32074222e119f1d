//! Typed async client for the admin back-office REST API (`/api/v1`).
//!
//! [`ApiClient`] owns the HTTP connection and bearer token. Endpoint groups
//! are inherent methods (`add_user`, `get_posts`, ...) and the
//! [`Resource`] helpers expose the same CRUD surface over plain JSON
//! records for table and form code.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod query;
pub mod resource;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::*;
pub use query::{ListQuery, Sort, SortDirection, parse_created_from};
pub use resource::Resource;
pub use transport::{TlsMode, TransportConfig};
