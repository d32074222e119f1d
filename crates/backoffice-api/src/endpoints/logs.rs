// Log endpoints (`/api/v1/logs`), including the read-only login log.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, CreateLogDto, Envelope, ListEnvelope, LoginLog, UpdateLogDto};
use crate::query::ListQuery;

impl ApiClient {
    /// `POST /logs`
    pub async fn add_log(&self, data: &CreateLogDto) -> Result<Envelope<u64>, Error> {
        self.post("logs", data).await
    }

    /// Operation logs. The payload shape is not fixed by the backend.
    ///
    /// `GET /logs`
    pub async fn get_logs(&self, query: &ListQuery) -> Result<ListEnvelope<Value>, Error> {
        self.get_with_params("logs", &query.to_pairs()?).await
    }

    /// Login attempts. Supports the `nickname` filter.
    ///
    /// `GET /logs/login`
    pub async fn get_login_logs(&self, query: &ListQuery) -> Result<ListEnvelope<LoginLog>, Error> {
        debug!("listing login logs");
        self.get_with_params("logs/login", &query.to_pairs()?).await
    }

    /// `GET /logs/{id}`
    pub async fn get_log(&self, id: u64) -> Result<Envelope<Value>, Error> {
        self.get(&format!("logs/{id}")).await
    }

    /// `PATCH /logs/{id}`
    pub async fn set_log(&self, id: u64, data: &UpdateLogDto) -> Result<Ack, Error> {
        self.patch(&format!("logs/{id}"), data).await
    }

    /// `DELETE /logs/{id}`
    pub async fn del_log(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting log");
        self.delete(&format!("logs/{id}")).await
    }
}
