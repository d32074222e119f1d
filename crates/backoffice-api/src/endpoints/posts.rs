// Post endpoints (`/api/v1/posts`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, CreatePostDto, Envelope, ListEnvelope, Post, UpdatePostDto};
use crate::query::ListQuery;

impl ApiClient {
    /// `POST /posts`
    pub async fn add_post(&self, data: &CreatePostDto) -> Result<Envelope<u64>, Error> {
        debug!(title = %data.title, "adding post");
        self.post("posts", data).await
    }

    /// `GET /posts`
    pub async fn get_posts(&self, query: &ListQuery) -> Result<ListEnvelope<Post>, Error> {
        self.get_with_params("posts", &query.to_pairs()?).await
    }

    /// Download the bulk-import spreadsheet template.
    ///
    /// `GET /posts/template.xlsx`
    pub async fn download_post_template(&self) -> Result<bytes::Bytes, Error> {
        self.get_bytes("posts/template.xlsx").await
    }

    /// `GET /posts/{id}`
    pub async fn get_post(&self, id: u64) -> Result<Envelope<Post>, Error> {
        self.get(&format!("posts/{id}")).await
    }

    /// `PATCH /posts/{id}`
    pub async fn set_post(&self, id: u64, data: &UpdatePostDto) -> Result<Ack, Error> {
        debug!(id, "updating post");
        self.patch(&format!("posts/{id}"), data).await
    }

    /// `DELETE /posts/{id}`
    pub async fn del_post(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting post");
        self.delete(&format!("posts/{id}")).await
    }
}
