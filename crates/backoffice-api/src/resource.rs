// Resource-generic CRUD over loosely-typed JSON records.
//
// Table and form layers work on JSON records rather than per-resource DTOs,
// so they go through these helpers. The typed endpoint methods in
// `crate::endpoints` share the same request plumbing.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Envelope, ListEnvelope};
use crate::query::ListQuery;

/// A CRUD resource exposed under `/api/v1`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Resource {
    User,
    Role,
    Permission,
    Log,
    LoginLog,
    File,
    Post,
    Category,
    Menu,
}

impl Resource {
    /// Collection path relative to the API root.
    pub fn path(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Role => "roles",
            Self::Permission => "permissions",
            Self::Log => "logs",
            Self::LoginLog => "logs/login",
            Self::File => "file",
            Self::Post => "posts",
            Self::Category => "categories",
            Self::Menu => "menus",
        }
    }

    /// Login logs are read-only; files are created through multipart upload.
    pub fn supports_create(self) -> bool {
        !matches!(self, Self::LoginLog | Self::File)
    }

    pub fn supports_item_ops(self) -> bool {
        !matches!(self, Self::LoginLog)
    }

    fn item_path(self, id: u64) -> Result<String, Error> {
        if !self.supports_item_ops() {
            return Err(Error::UnsupportedOperation {
                resource: self.into(),
                operation: "item access",
            });
        }
        Ok(format!("{}/{id}", self.path()))
    }
}

impl ApiClient {
    /// `GET /{resource}` with paging, sort and filter parameters.
    pub async fn list_records(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<ListEnvelope<Value>, Error> {
        let params = query.to_pairs()?;
        debug!(%resource, "listing records");
        self.get_with_params(resource.path(), &params).await
    }

    /// `GET /{resource}/{id}`
    pub async fn get_record(&self, resource: Resource, id: u64) -> Result<Envelope<Value>, Error> {
        let path = resource.item_path(id)?;
        debug!(%resource, id, "fetching record");
        self.get(&path).await
    }

    /// `POST /{resource}` with a JSON body.
    pub async fn create_record(
        &self,
        resource: Resource,
        body: &Value,
    ) -> Result<Envelope<Value>, Error> {
        if !resource.supports_create() {
            return Err(Error::UnsupportedOperation {
                resource: resource.into(),
                operation: "create",
            });
        }
        debug!(%resource, "creating record");
        self.post(resource.path(), body).await
    }

    /// `PATCH /{resource}/{id}` with a JSON body.
    pub async fn update_record(
        &self,
        resource: Resource,
        id: u64,
        body: &Value,
    ) -> Result<Ack, Error> {
        let path = resource.item_path(id)?;
        debug!(%resource, id, "updating record");
        self.patch(&path, body).await
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete_record(&self, resource: Resource, id: u64) -> Result<Ack, Error> {
        let path = resource.item_path(id)?;
        debug!(%resource, id, "deleting record");
        self.delete(&path).await
    }
}
