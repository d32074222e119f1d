// Menu endpoints (`/api/v1/menus`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, CreateMenuDto, Envelope, ListEnvelope, Menu, UpdateMenuDto};
use crate::query::ListQuery;

impl ApiClient {
    /// `POST /menus`
    pub async fn add_menu(&self, data: &CreateMenuDto) -> Result<Envelope<u64>, Error> {
        debug!(code = %data.code, "adding menu");
        self.post("menus", data).await
    }

    /// Page through menus. With `tree` set the backend nests children
    /// under their parents instead of returning a flat list.
    ///
    /// `GET /menus`
    pub async fn get_menus(&self, query: &ListQuery, tree: bool) -> Result<ListEnvelope<Menu>, Error> {
        let mut params = query.to_pairs()?;
        if tree {
            params.push(("tree".to_owned(), "true".to_owned()));
        }
        self.get_with_params("menus", &params).await
    }

    /// `GET /menus/{id}`
    pub async fn get_menu(&self, id: u64) -> Result<Envelope<Menu>, Error> {
        self.get(&format!("menus/{id}")).await
    }

    /// `PATCH /menus/{id}`
    pub async fn set_menu(&self, id: u64, data: &UpdateMenuDto) -> Result<Ack, Error> {
        debug!(id, "updating menu");
        self.patch(&format!("menus/{id}"), data).await
    }

    /// `DELETE /menus/{id}`
    pub async fn del_menu(&self, id: u64) -> Result<Ack, Error> {
        debug!(id, "deleting menu");
        self.delete(&format!("menus/{id}")).await
    }
}
