// Role endpoints (`/api/v1/roles`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, CreateRoleDto, Envelope, ListEnvelope, Role, UpdateRoleDto};
use crate::query::ListQuery;

impl ApiClient {
    /// `POST /roles`
    pub async fn add_role(&self, data: &CreateRoleDto) -> Result<Envelope<u64>, Error> {
        debug!(slug = %data.slug, "adding role");
        self.post("roles", data).await
    }

    /// `GET /roles`
    pub async fn get_roles(&self, query: &ListQuery) -> Result<ListEnvelope<Role>, Error> {
        self.get_with_params("roles", &query.to_pairs()?).await
    }

    /// `GET /roles/{id}`
    pub async fn get_role(&self, id: u64) -> Result<Envelope<Role>, Error> {
        self.get(&format!("roles/{id}")).await
    }

    /// `PATCH /roles/{id}`
    pub async fn set_role(&self, id: u64, data: &UpdateRoleDto) -> Result<Ack, Error> {
        debug!(id, "updating role");
        self.patch(&format!("roles/{id}"), data).await
    }

    /// `DELETE /roles/{id}`
    pub async fn del_role(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting role");
        self.delete(&format!("roles/{id}")).await
    }
}
