// ── Data table controller ──
//
// Owns paging, loading and the render buffer for one table. Rows come
// either from a static collection (filtered and paged locally) or from a
// remote `DataSource` (paged by the server). The table also hosts the
// search form and the create / modify dialogs, and reloads after either
// dialog submits.
//
// Remote loads are split into `begin_load` / `PendingLoad::run` /
// `finish_load` so a host can drive several in flight. Each load carries a
// request token and only the newest one is applied.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::form::{
    Form, FormItem, FormMessage, FormModal, FormNotice, ModalOutcome, Props, SearchHook,
    SubmitHandler,
};
use crate::search::{SearchConfig, build_search_form};
use crate::source::{DataSource, Page, Paging, Record};

/// Page size used by [`DataTable::reload_data`].
pub const RELOAD_PAGE_SIZE: u32 = 10;

/// Default number of search fields that still fit inline with the toolbar.
pub const DEFAULT_SEARCH_INLINE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: RELOAD_PAGE_SIZE,
            total: 0,
        }
    }
}

/// Paging overrides for one load. Unset fields keep the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub current: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn page(current: u32) -> Self {
        Self {
            current: Some(current),
            page_size: None,
        }
    }

    pub fn sized(current: u32, page_size: u32) -> Self {
        Self {
            current: Some(current),
            page_size: Some(page_size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SourceMode {
    Static,
    Remote,
}

/// Where a table's rows come from.
#[derive(Clone)]
pub enum TableData {
    Static(Vec<Record>),
    Remote(Arc<dyn DataSource>),
}

impl TableData {
    pub fn remote(source: impl DataSource + 'static) -> Self {
        Self::Remote(Arc::new(source))
    }

    pub fn mode(&self) -> SourceMode {
        match self {
            Self::Static(_) => SourceMode::Static,
            Self::Remote(_) => SourceMode::Remote,
        }
    }
}

impl fmt::Debug for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(rows) => f.debug_tuple("Static").field(&rows.len()).finish(),
            Self::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub pagination: Pagination,
    pub search_inline_count: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            pagination: Pagination::default(),
            search_inline_count: DEFAULT_SEARCH_INLINE_COUNT,
        }
    }
}

// ── Remote load cycle ────────────────────────────────────────────────

/// A remote request that has been issued a token but not yet run.
pub struct PendingLoad {
    token: u64,
    paging: Paging,
    search: Record,
    source: Arc<dyn DataSource>,
}

impl PendingLoad {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn paging(&self) -> Paging {
        self.paging
    }

    /// Call the data source. Does not touch the table.
    pub async fn run(self) -> LoadResult {
        let result = self.source.fetch(&self.search, self.paging).await;
        LoadResult {
            token: self.token,
            paging: self.paging,
            result,
        }
    }
}

/// Outcome of a [`PendingLoad`], to be handed back to
/// [`DataTable::finish_load`].
#[derive(Debug)]
pub struct LoadResult {
    pub token: u64,
    pub paging: Paging,
    pub result: Result<Page, CoreError>,
}

// ── Builder ──────────────────────────────────────────────────────────

pub struct DataTableBuilder {
    data: TableData,
    config: TableConfig,
    search: Option<SearchConfig>,
    create: Option<FormModal>,
    modify: Option<FormModal>,
}

impl DataTableBuilder {
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Search descriptors; `extend` keys resolve against the create
    /// dialog's items.
    pub fn search(mut self, search: SearchConfig) -> Self {
        self.search = Some(search);
        self
    }

    pub fn create(mut self, modal: FormModal) -> Self {
        self.create = Some(modal);
        self
    }

    pub fn modify(mut self, modal: FormModal) -> Self {
        self.modify = Some(modal);
        self
    }

    pub fn build(self) -> DataTable {
        let search_item_count = self.search.as_ref().map_or(0, SearchConfig::item_count);
        let extend_items: &[FormItem] = self
            .create
            .as_ref()
            .map_or(&[], |modal| modal.form().items());
        let (search, search_form_props) = match build_search_form(self.search.as_ref(), extend_items) {
            Some(mut built) => {
                for item in &mut built.items {
                    bind_search_hooks(item);
                }
                let props = std::mem::take(&mut built.form_props);
                (Some(built.into_form()), props)
            }
            None => (None, Props::new()),
        };

        let mut table = DataTable {
            data: TableData::Static(Vec::new()),
            pagination: self.config.pagination,
            search_inline_count: self.config.search_inline_count,
            search_item_count,
            loading: false,
            rows: Vec::new(),
            search,
            search_form_props,
            create: self.create,
            modify: self.modify,
            mounted: false,
            next_token: 0,
            latest_token: None,
            last_error: None,
        };
        table.set_data(self.data);
        table
    }
}

/// Search triggers (and the submit button) reload the table.
fn bind_search_hooks(item: &mut FormItem) {
    if item.on_search.is_some() || item.is_submit() {
        item.on_search = Some(SearchHook::Reload);
    }
    if item.on_press_enter.is_some() {
        item.on_press_enter = Some(SearchHook::Reload);
    }
}

// ── Controller ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DataTable {
    data: TableData,
    pagination: Pagination,
    search_inline_count: usize,
    search_item_count: usize,
    loading: bool,
    rows: Vec<Record>,
    search: Option<Form>,
    search_form_props: Props,
    create: Option<FormModal>,
    modify: Option<FormModal>,
    mounted: bool,
    next_token: u64,
    latest_token: Option<u64>,
    last_error: Option<String>,
}

impl DataTable {
    pub fn builder(data: TableData) -> DataTableBuilder {
        DataTableBuilder {
            data,
            config: TableConfig::default(),
            search: None,
            create: None,
            modify: None,
        }
    }

    // ── State accessors ──────────────────────────────────────────────

    pub fn mode(&self) -> SourceMode {
        self.data.mode()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The full render buffer from the last load.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Message of the last failed remote load, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn search_form(&self) -> Option<&Form> {
        self.search.as_ref()
    }

    pub fn search_form_mut(&mut self) -> Option<&mut Form> {
        self.search.as_mut()
    }

    pub fn search_form_props(&self) -> &Props {
        &self.search_form_props
    }

    pub fn create_modal(&self) -> Option<&FormModal> {
        self.create.as_ref()
    }

    pub fn create_modal_mut(&mut self) -> Option<&mut FormModal> {
        self.create.as_mut()
    }

    pub fn modify_modal(&self) -> Option<&FormModal> {
        self.modify.as_ref()
    }

    pub fn modify_modal_mut(&mut self) -> Option<&mut FormModal> {
        self.modify.as_mut()
    }

    /// Whether the search form is small enough to sit inline with the
    /// toolbar. Counts the configured descriptors, including a `submit`
    /// item that `hide_search` dropped from the form.
    pub fn inlined(&self) -> bool {
        self.search_item_count <= self.search_inline_count
    }

    /// Rows for the current page. Static tables page locally; remote tables
    /// already hold exactly one page.
    pub fn visible_rows(&self) -> &[Record] {
        match self.data {
            TableData::Remote(_) => &self.rows,
            TableData::Static(_) => {
                let size = usize::try_from(self.pagination.page_size).unwrap_or(usize::MAX);
                let page = usize::try_from(self.pagination.current.saturating_sub(1)).unwrap_or(0);
                let start = page.saturating_mul(size).min(self.rows.len());
                let end = start.saturating_add(size).min(self.rows.len());
                &self.rows[start..end]
            }
        }
    }

    // ── Data source ──────────────────────────────────────────────────

    /// Replace the data source. Static rows are shown immediately, unfiltered,
    /// from page one.
    pub fn set_data(&mut self, data: TableData) {
        if let TableData::Static(rows) = &data {
            self.rows.clone_from(rows);
            self.pagination.total = u64::try_from(rows.len()).unwrap_or(u64::MAX);
            self.pagination.current = 1;
        }
        self.data = data;
    }

    /// Initial load. Only the first call does anything.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.load_data(PageRequest::default()).await;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Load with the current paging, overridden by `request`.
    pub async fn load_data(&mut self, request: PageRequest) {
        if let Some(pending) = self.begin_load(request) {
            let result = pending.run().await;
            self.finish_load(result);
        }
    }

    /// Start a load. Static tables are filtered right away and `None` is
    /// returned; remote tables enter the loading state and hand back the
    /// request to run.
    pub fn begin_load(&mut self, request: PageRequest) -> Option<PendingLoad> {
        let paging = Paging {
            page: request.current.unwrap_or(self.pagination.current),
            size: request.page_size.unwrap_or(self.pagination.page_size),
        };
        let search = self.search_model();

        match &self.data {
            TableData::Static(rows) => {
                self.rows = filter_rows(rows, &search);
                self.pagination.page_size = paging.size;
                self.pagination.total = u64::try_from(self.rows.len()).unwrap_or(u64::MAX);
                self.pagination.current = 1;
                debug!(rows = self.rows.len(), "static rows filtered");
                None
            }
            TableData::Remote(source) => {
                self.next_token += 1;
                let token = self.next_token;
                self.latest_token = Some(token);
                self.loading = true;
                debug!(token, page = paging.page, size = paging.size, "remote load started");
                Some(PendingLoad {
                    token,
                    paging,
                    search,
                    source: Arc::clone(source),
                })
            }
        }
    }

    /// Apply a finished load. Returns `false` when a newer load has been
    /// started since, in which case nothing changes.
    pub fn finish_load(&mut self, load: LoadResult) -> bool {
        if self.latest_token != Some(load.token) {
            debug!(token = load.token, latest = ?self.latest_token, "discarding stale response");
            return false;
        }

        self.loading = false;
        match load.result {
            Ok(page) => {
                debug!(token = load.token, rows = page.data.len(), total = page.total, "remote load finished");
                self.rows = page.data;
                self.pagination.total = page.total;
                self.pagination.current = load.paging.page;
                self.pagination.page_size = load.paging.size;
                self.last_error = None;
            }
            Err(e) => {
                warn!(token = load.token, error = %e, "remote load failed");
                self.last_error = Some(e.display_message());
            }
        }
        true
    }

    /// Back to page one with the default page size.
    pub async fn reload_data(&mut self) {
        self.load_data(PageRequest::sized(1, RELOAD_PAGE_SIZE)).await;
    }

    /// Move to another page, keeping the page size. Static tables only move
    /// the local window; remote tables fetch the page.
    pub async fn page_change(&mut self, current: u32) {
        match self.data {
            TableData::Static(_) => {
                let size = u64::from(self.pagination.page_size.max(1));
                let last = u32::try_from(self.pagination.total.div_ceil(size))
                    .unwrap_or(u32::MAX)
                    .max(1);
                self.pagination.current = current.clamp(1, last);
            }
            TableData::Remote(_) => self.load_data(PageRequest::page(current)).await,
        }
    }

    fn search_model(&self) -> Record {
        self.search
            .as_ref()
            .map(Form::get_model)
            .unwrap_or_default()
    }

    // ── Search integration ───────────────────────────────────────────

    /// Forward a message to the search form, reloading when a search
    /// trigger fires.
    pub async fn search_update(&mut self, message: FormMessage) -> Option<FormNotice> {
        let notice = self.search.as_mut()?.update(message);
        if let Some(notice) = &notice {
            self.handle_search(notice).await;
        }
        notice
    }

    /// React to a notice from the search form.
    pub async fn handle_search(&mut self, notice: &FormNotice) {
        if let FormNotice::SearchRequested { field } = notice {
            debug!(field, "search requested");
            self.reload_data().await;
        }
    }

    // ── Modal integration ────────────────────────────────────────────

    /// Open the create dialog. Returns `false` when the table has none.
    pub fn open_create(&mut self) -> bool {
        let Some(modal) = self.create.as_mut() else {
            return false;
        };
        modal.open(None);
        true
    }

    /// Open the modify dialog with `row` loaded.
    pub fn open_modify(&mut self, row: &Record) -> bool {
        let Some(modal) = self.modify.as_mut() else {
            return false;
        };
        modal.open(Some(row));
        true
    }

    pub async fn submit_create<H>(&mut self, handler: &H) -> Result<ModalOutcome, CoreError>
    where
        H: SubmitHandler + ?Sized,
    {
        let Some(modal) = self.create.as_mut() else {
            return Err(missing_modal("create"));
        };
        let outcome = modal.submit(handler).await?;
        if outcome == ModalOutcome::Submitted {
            self.reload_data().await;
        }
        Ok(outcome)
    }

    pub async fn submit_modify<H>(&mut self, handler: &H) -> Result<ModalOutcome, CoreError>
    where
        H: SubmitHandler + ?Sized,
    {
        let Some(modal) = self.modify.as_mut() else {
            return Err(missing_modal("modify"));
        };
        let outcome = modal.submit(handler).await?;
        if outcome == ModalOutcome::Submitted {
            self.reload_data().await;
        }
        Ok(outcome)
    }
}

fn missing_modal(kind: &str) -> CoreError {
    CoreError::Unsupported {
        operation: format!("{kind} dialog"),
        resource: "table".into(),
    }
}

/// AND over every non-empty search value: substring match for strings,
/// strict equality for everything else.
fn filter_rows(rows: &[Record], search: &Record) -> Vec<Record> {
    let filters: Vec<(&String, &Value)> = search
        .iter()
        .filter(|(_, value)| !value.is_null() && value.as_str() != Some(""))
        .collect();

    rows.iter()
        .filter(|row| {
            filters.iter().all(|(key, wanted)| match wanted {
                Value::String(needle) => row
                    .get(key.as_str())
                    .and_then(Value::as_str)
                    .is_some_and(|cell| cell.contains(needle.as_str())),
                other => row.get(key.as_str()) == Some(*other),
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::form::{Rule, Setter};
    use crate::search::{SearchItem, SearchObject};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn name_search() -> SearchConfig {
        SearchConfig::Items(vec![SearchItem::field("name"), SearchItem::field("submit")])
    }

    fn set_search(table: &mut DataTable, field: &str, value: Value) {
        table.search_form_mut().unwrap().update(FormMessage::Change {
            field: field.into(),
            value,
        });
    }

    /// Remote source that records every request and answers with
    /// `size` rows and a fixed total.
    fn recording_source(calls: Arc<Mutex<Vec<(Record, Paging)>>>) -> TableData {
        TableData::remote(move |search: Record, paging: Paging| {
            calls.lock().unwrap().push((search, paging));
            async move {
                let data = (0..paging.size.min(3))
                    .map(|i| json!({ "id": i }).as_object().unwrap().clone())
                    .collect();
                Ok::<_, CoreError>(Page { data, total: 42 })
            }
        })
    }

    // ── Static mode ──

    #[tokio::test]
    async fn static_filter_uses_substring_and_resets_page() {
        let data = rows(json!([{ "name": "Alice" }, { "name": "Bob" }]));
        let mut table = DataTable::builder(TableData::Static(data))
            .search(name_search())
            .build();
        assert_eq!(table.pagination().total, 2);

        set_search(&mut table, "name", json!("li"));
        table.load_data(PageRequest::page(3)).await;

        assert_eq!(table.rows(), rows(json!([{ "name": "Alice" }])).as_slice());
        assert_eq!(table.pagination().total, 1);
        assert_eq!(table.pagination().current, 1);
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn static_filter_is_case_sensitive_and_strict_for_non_strings() {
        let data = rows(json!([
            { "name": "Alice", "age": 30, "active": true },
            { "name": "alina", "age": 30, "active": false },
            { "name": "Bob", "age": "30", "active": true }
        ]));
        let mut table = DataTable::builder(TableData::Static(data))
            .search(SearchConfig::Items(vec![
                SearchItem::field("name"),
                SearchItem::field("age"),
                SearchItem::field("active"),
            ]))
            .build();

        set_search(&mut table, "name", json!("A"));
        set_search(&mut table, "age", json!(30));
        table.load_data(PageRequest::default()).await;
        let names: Vec<_> = table.rows().iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("Alice")]);

        set_search(&mut table, "name", Value::Null);
        set_search(&mut table, "active", json!(false));
        table.load_data(PageRequest::default()).await;
        let names: Vec<_> = table.rows().iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("alina")]);
    }

    #[tokio::test]
    async fn static_pages_are_sliced_locally() {
        let data: Vec<Record> = (1..=25)
            .map(|i| json!({ "id": i }).as_object().unwrap().clone())
            .collect();
        let mut table = DataTable::builder(TableData::Static(data)).build();
        table.mount().await;

        assert_eq!(table.visible_rows().len(), 10);
        table.page_change(3).await;
        assert_eq!(table.pagination().current, 3);
        assert_eq!(table.visible_rows().len(), 5);
        assert_eq!(table.visible_rows()[0]["id"], 21);

        table.page_change(99).await;
        assert_eq!(table.pagination().current, 3);
    }

    #[test]
    fn set_data_replaces_rows_and_resets_paging() {
        let mut table = DataTable::builder(TableData::Static(Vec::new())).build();
        table.set_data(TableData::Static(rows(json!([{ "a": 1 }, { "a": 2 }, { "a": 3 }]))));
        assert_eq!(table.mode(), SourceMode::Static);
        assert_eq!(table.pagination().total, 3);
        assert_eq!(table.pagination().current, 1);
        assert_eq!(table.rows().len(), 3);
    }

    // ── Remote mode ──

    #[tokio::test]
    async fn remote_load_uses_requested_page_and_current_size() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls)))
            .config(TableConfig {
                pagination: Pagination {
                    current: 1,
                    page_size: 20,
                    total: 0,
                },
                ..TableConfig::default()
            })
            .build();

        table.load_data(PageRequest::page(2)).await;

        let (_, paging) = calls.lock().unwrap()[0].clone();
        assert_eq!(paging, Paging { page: 2, size: 20 });
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.pagination().total, 42);
        assert_eq!(table.pagination().current, 2);
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn remote_search_sends_encoded_model() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls)))
            .search(SearchConfig::Items(vec![SearchItem::field("[from,to]")]))
            .build();

        set_search(&mut table, "[from,to]", json!(["2024-01-01", "2024-02-01"]));
        table.load_data(PageRequest::default()).await;

        let (search, _) = calls.lock().unwrap()[0].clone();
        assert_eq!(Value::Object(search), json!({ "from": "2024-01-01", "to": "2024-02-01" }));
    }

    #[tokio::test]
    async fn reload_always_requests_first_page_of_ten() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls))).build();

        table.load_data(PageRequest::sized(4, 50)).await;
        table.reload_data().await;

        let (_, paging) = calls.lock().unwrap()[1].clone();
        assert_eq!(paging, Paging { page: 1, size: 10 });
        assert_eq!(table.pagination().current, 1);
        assert_eq!(table.pagination().page_size, 10);
    }

    #[tokio::test]
    async fn page_change_keeps_page_size() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls))).build();

        table.load_data(PageRequest::sized(1, 25)).await;
        table.page_change(5).await;

        let (_, paging) = calls.lock().unwrap()[1].clone();
        assert_eq!(paging, Paging { page: 5, size: 25 });
    }

    #[tokio::test]
    async fn failed_load_clears_loading_and_keeps_rows() {
        let fail = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&fail);
        let source = TableData::remote(move |_search: Record, _paging: Paging| {
            let failing = *flag.lock().unwrap();
            async move {
                if failing {
                    Err(CoreError::Api {
                        message: "backend down".into(),
                        code: None,
                        status: Some(503),
                    })
                } else {
                    Ok(Page {
                        data: vec![json!({ "id": 1 }).as_object().unwrap().clone()],
                        total: 1,
                    })
                }
            }
        });
        let mut table = DataTable::builder(source).build();
        table.mount().await;
        assert_eq!(table.rows().len(), 1);

        *fail.lock().unwrap() = true;
        table.reload_data().await;

        assert!(!table.is_loading());
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.last_error(), Some("backend down"));
    }

    #[tokio::test]
    async fn stale_responses_are_discarded() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(calls)).build();

        let first = table.begin_load(PageRequest::page(1)).unwrap();
        let second = table.begin_load(PageRequest::page(2)).unwrap();
        assert!(table.is_loading());

        let newer = second.run().await;
        let older = first.run().await;

        assert!(table.finish_load(newer));
        assert!(!table.finish_load(older));
        assert_eq!(table.pagination().current, 2);
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn stale_response_does_not_end_loading() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(calls)).build();

        let first = table.begin_load(PageRequest::page(1)).unwrap();
        let _second = table.begin_load(PageRequest::page(2)).unwrap();

        assert!(!table.finish_load(first.run().await));
        assert!(table.is_loading());
    }

    #[tokio::test]
    async fn mount_loads_only_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls))).build();

        table.mount().await;
        table.mount().await;
        assert!(table.is_mounted());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    // ── Search and modal integration ──

    #[tokio::test]
    async fn search_triggers_reload_from_first_page() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut search_item = SearchItem::field("nickname");
        search_item.enterable = true;
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls)))
            .search(SearchConfig::Items(vec![search_item, SearchItem::field("submit")]))
            .build();
        table.load_data(PageRequest::page(3)).await;

        set_search(&mut table, "nickname", json!("ali"));
        let notice = table
            .search_update(FormMessage::PressEnter {
                field: "nickname".into(),
            })
            .await;
        assert!(matches!(notice, Some(FormNotice::SearchRequested { .. })));

        table
            .search_update(FormMessage::Search {
                field: "submit".into(),
            })
            .await;

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].1, Paging { page: 1, size: 10 });
        assert_eq!(calls[1].0["nickname"], "ali");
    }

    #[test]
    fn search_extends_create_items_and_reports_inline() {
        let create = FormModal::new(vec![
            FormItem::new("title", Setter::Input).label("Title").rule(Rule::required()),
            FormItem::new("slug", Setter::Input).label("Slug"),
        ]);
        let table = DataTable::builder(TableData::Static(Vec::new()))
            .create(create)
            .search(SearchConfig::Items(vec![SearchItem::extend("title")]))
            .build();

        let search = table.search_form().unwrap();
        assert_eq!(search.items()[0].setter_props["placeholder"], "Title");
        assert_eq!(table.search_form_props()["layout"], "inline");
        assert!(table.inlined());

        let crowded = DataTable::builder(TableData::Static(Vec::new()))
            .search(SearchConfig::Items(
                ["a", "b", "c", "d"].into_iter().map(SearchItem::field).collect(),
            ))
            .build();
        assert!(!crowded.inlined());
    }

    #[test]
    fn inline_count_uses_configured_descriptors() {
        let shown = DataTable::builder(TableData::Static(Vec::new()))
            .search(SearchConfig::Items(
                ["a", "b", "submit"].into_iter().map(SearchItem::field).collect(),
            ))
            .build();
        assert!(shown.search_form().unwrap().items().iter().any(FormItem::is_submit));
        assert!(shown.inlined());

        let hidden = DataTable::builder(TableData::Static(Vec::new()))
            .search(SearchConfig::Object(SearchObject {
                items: ["a", "b", "c", "submit"].into_iter().map(SearchItem::field).collect(),
                hide_search: true,
                ..SearchObject::default()
            }))
            .build();
        assert_eq!(hidden.search_form().unwrap().items().len(), 3);
        assert!(!hidden.inlined());
    }

    #[tokio::test]
    async fn successful_modify_reloads_the_table() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let modify = FormModal::new(vec![FormItem::new("title", Setter::Input).rule(Rule::required())]);
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls)))
            .modify(modify)
            .build();
        table.load_data(PageRequest::page(4)).await;

        let row = json!({ "id": 3, "title": "Hello" }).as_object().unwrap().clone();
        assert!(table.open_modify(&row));
        assert!(table.modify_modal().unwrap().is_visible());

        let handler = |model: Record, _items: Vec<FormItem>| async move {
            assert_eq!(model["title"], "Hello");
            Ok::<(), CoreError>(())
        };
        let outcome = table.submit_modify(&handler).await.unwrap();

        assert_eq!(outcome, ModalOutcome::Submitted);
        assert!(!table.modify_modal().unwrap().is_visible());
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(table.pagination().current, 1);
    }

    #[tokio::test]
    async fn invalid_create_does_not_reload() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let create = FormModal::new(vec![FormItem::new("title", Setter::Input).rule(Rule::required())]);
        let mut table = DataTable::builder(recording_source(Arc::clone(&calls)))
            .create(create)
            .build();

        assert!(table.open_create());
        let handler = |_model: Record, _items: Vec<FormItem>| async { Ok::<(), CoreError>(()) };
        let outcome = table.submit_create(&handler).await.unwrap();

        assert!(matches!(outcome, ModalOutcome::Invalid(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_without_modal_is_an_error() {
        let mut table = DataTable::builder(TableData::Static(Vec::new())).build();
        let handler = |_model: Record, _items: Vec<FormItem>| async { Ok::<(), CoreError>(()) };
        assert!(table.submit_create(&handler).await.is_err());
        assert!(!table.open_modify(&Record::new()));
    }
}
