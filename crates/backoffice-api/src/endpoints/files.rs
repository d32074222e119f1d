// File endpoints (`/api/v1/file`).
//
// Uploads go out as `multipart/form-data` with a single `file` part; every
// other call is plain JSON.

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Envelope, ListEnvelope, Upload};
use crate::query::ListQuery;

impl ApiClient {
    /// Upload a file.
    ///
    /// `POST /file` (multipart, field `file`)
    pub async fn upload_file(
        &self,
        file_name: &str,
        content: Vec<u8>,
        mime_type: Option<&str>,
    ) -> Result<Envelope<Upload>, Error> {
        debug!(file_name, len = content.len(), "uploading file");
        let mut part = Part::bytes(content).file_name(file_name.to_owned());
        if let Some(mime) = mime_type {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);
        self.post_multipart("file", form).await
    }

    /// `GET /file`
    pub async fn get_files(&self, query: &ListQuery) -> Result<ListEnvelope<Upload>, Error> {
        self.get_with_params("file", &query.to_pairs()?).await
    }

    /// `GET /file/{id}`
    pub async fn get_file(&self, id: u64) -> Result<Envelope<Upload>, Error> {
        self.get(&format!("file/{id}")).await
    }

    /// Look a file up by its content hash (deduplicated uploads).
    ///
    /// `GET /file/hash/{hash}`
    pub async fn get_file_by_hash(&self, hash: &str) -> Result<Envelope<Upload>, Error> {
        self.get(&format!("file/hash/{hash}")).await
    }

    /// `PATCH /file/{id}`
    pub async fn set_file(&self, id: u64, data: &Value) -> Result<Ack, Error> {
        self.patch(&format!("file/{id}"), data).await
    }

    /// `DELETE /file/{id}`
    pub async fn del_file(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting file");
        self.delete(&format!("file/{id}")).await
    }
}
