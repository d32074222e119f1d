// Permission endpoints (`/api/v1/permissions`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    Ack, CreatePermissionDto, Envelope, ListEnvelope, Permission, UpdatePermissionDto,
};
use crate::query::ListQuery;

impl ApiClient {
    /// `POST /permissions`
    pub async fn add_permission(&self, data: &CreatePermissionDto) -> Result<Envelope<u64>, Error> {
        debug!(slug = %data.slug, "adding permission");
        self.post("permissions", data).await
    }

    /// `GET /permissions`
    pub async fn get_permissions(
        &self,
        query: &ListQuery,
    ) -> Result<ListEnvelope<Permission>, Error> {
        self.get_with_params("permissions", &query.to_pairs()?).await
    }

    /// `GET /permissions/{id}`
    pub async fn get_permission(&self, id: u64) -> Result<Envelope<Permission>, Error> {
        self.get(&format!("permissions/{id}")).await
    }

    /// `PATCH /permissions/{id}`
    pub async fn set_permission(&self, id: u64, data: &UpdatePermissionDto) -> Result<Ack, Error> {
        debug!(id, "updating permission");
        self.patch(&format!("permissions/{id}"), data).await
    }

    /// `DELETE /permissions/{id}`
    pub async fn del_permission(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting permission");
        self.delete(&format!("permissions/{id}")).await
    }
}
