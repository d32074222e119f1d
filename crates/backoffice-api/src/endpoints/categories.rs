// Category endpoints (`/api/v1/categories`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Category, CreateCategoryDto, Envelope, ListEnvelope, UpdateCategoryDto};
use crate::query::ListQuery;

impl ApiClient {
    /// `POST /categories`
    pub async fn add_category(&self, data: &CreateCategoryDto) -> Result<Envelope<u64>, Error> {
        debug!(slug = %data.slug, "adding category");
        self.post("categories", data).await
    }

    /// `GET /categories`
    pub async fn get_categories(&self, query: &ListQuery) -> Result<ListEnvelope<Category>, Error> {
        self.get_with_params("categories", &query.to_pairs()?).await
    }

    /// `GET /categories/{id}`
    pub async fn get_category(&self, id: u64) -> Result<Envelope<Category>, Error> {
        self.get(&format!("categories/{id}")).await
    }

    /// `PATCH /categories/{id}`
    pub async fn set_category(&self, id: u64, data: &UpdateCategoryDto) -> Result<Ack, Error> {
        debug!(id, "updating category");
        self.patch(&format!("categories/{id}"), data).await
    }

    /// `DELETE /categories/{id}`
    pub async fn del_category(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting category");
        self.delete(&format!("categories/{id}")).await
    }
}
