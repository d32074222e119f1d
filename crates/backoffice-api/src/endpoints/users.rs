// User endpoints (`/api/v1/users`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, CreateUserDto, Envelope, ListEnvelope, UpdateUserDto, User};
use crate::query::ListQuery;

impl ApiClient {
    /// Create a user. Returns the new user's id.
    ///
    /// `POST /users`
    pub async fn add_user(&self, data: &CreateUserDto) -> Result<Envelope<u64>, Error> {
        debug!(username = %data.username, "adding user");
        self.post("users", data).await
    }

    /// Page through users. Supports the `nickname` filter.
    ///
    /// `GET /users`
    pub async fn get_users(&self, query: &ListQuery) -> Result<ListEnvelope<User>, Error> {
        self.get_with_params("users", &query.to_pairs()?).await
    }

    /// `GET /users/{id}`
    pub async fn get_user(&self, id: u64) -> Result<Envelope<User>, Error> {
        self.get(&format!("users/{id}")).await
    }

    /// `PATCH /users/{id}`
    pub async fn set_user(&self, id: u64, data: &UpdateUserDto) -> Result<Ack, Error> {
        debug!(id, "updating user");
        self.patch(&format!("users/{id}"), data).await
    }

    /// `DELETE /users/{id}`
    pub async fn del_user(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting user");
        self.delete(&format!("users/{id}")).await
    }
}
