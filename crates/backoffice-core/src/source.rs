// ── Data sources ──
//
// A remote table pulls rows through a `DataSource`: given the search
// form's encoded model and the requested page, it resolves to one page of
// records plus the server-side total. Closures implement the trait, and
// `ResourceSource` binds it to an API list endpoint.

use std::future::Future;
use std::sync::Arc;

use backoffice_api::{ApiClient, ListQuery, Resource, Sort};
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;

/// A single row: an ordered JSON object.
pub type Record = serde_json::Map<String, Value>;

/// Page request handed to a data source. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub size: u32,
}

/// One page of results: the inner `{ data, total }` payload of a list
/// response. Missing fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Page {
    pub data: Vec<Record>,
    pub total: u64,
}

impl Page {
    /// Extract the page from a wrapped `{ data: { data, total } }`
    /// response. Anything that does not fit becomes an empty page.
    pub fn from_response(response: &Value) -> Self {
        response
            .get("data")
            .and_then(|inner| Self::deserialize(inner).ok())
            .unwrap_or_default()
    }
}

/// Supplier of remote table rows.
pub trait DataSource: Send + Sync {
    fn fetch(&self, search: &Record, paging: Paging) -> BoxFuture<'static, Result<Page, CoreError>>;
}

impl<F, Fut> DataSource for F
where
    F: Fn(Record, Paging) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page, CoreError>> + Send + 'static,
{
    fn fetch(&self, search: &Record, paging: Paging) -> BoxFuture<'static, Result<Page, CoreError>> {
        Box::pin(self(search.clone(), paging))
    }
}

// ── API-backed source ────────────────────────────────────────────────

/// Lists a [`Resource`] through [`ApiClient::list_records`].
///
/// The search record becomes the endpoint's filter parameters; `null`
/// values are left out.
#[derive(Clone)]
pub struct ResourceSource {
    client: Arc<ApiClient>,
    resource: Resource,
    sort: Option<Sort>,
    extra: Vec<(String, String)>,
}

impl ResourceSource {
    pub fn new(client: Arc<ApiClient>, resource: Resource) -> Self {
        Self {
            client,
            resource,
            sort: None,
            extra: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// A fixed filter sent with every request (e.g. `tree=true`).
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    fn query(&self, search: &Record, paging: Paging) -> ListQuery {
        let mut query = ListQuery::new()
            .page(paging.page, paging.size)
            .extend_filters(search);
        if let Some(sort) = &self.sort {
            query = query.sort(sort.clone());
        }
        for (key, value) in &self.extra {
            query = query.filter(key.clone(), value.clone());
        }
        query
    }
}

impl DataSource for ResourceSource {
    fn fetch(&self, search: &Record, paging: Paging) -> BoxFuture<'static, Result<Page, CoreError>> {
        let client = Arc::clone(&self.client);
        let resource = self.resource;
        let query = self.query(search, paging);

        Box::pin(async move {
            let envelope = client.list_records(resource, &query).await?;
            let total = envelope.total;
            let data: Vec<Record> = envelope
                .data
                .into_iter()
                .filter_map(|row| match row {
                    Value::Object(map) => Some(map),
                    other => {
                        warn!(%resource, row = %other, "skipping non-object row");
                        None
                    }
                })
                .collect();
            debug!(%resource, rows = data.len(), total, "page fetched");
            Ok(Page { data, total })
        })
    }
}
