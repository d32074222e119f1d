//! Headless state model for data-driven admin screens.
//!
//! Hosts (a CLI here, any UI elsewhere) feed events in and read state out;
//! nothing in this crate renders.
//!
//! - **[`DataTable`]** — paging, loading and the render buffer over either
//!   static rows or a remote [`DataSource`], with an attached search form
//!   and create / modify dialogs.
//! - **[`Form`]** — model, items, validation and the submit pipeline,
//!   driven by [`FormMessage`]s. [`FormModal`] wraps one in a dialog.
//! - **[`build_search_form`]** — normalizes search descriptors, resolving
//!   `extend` references against another form's items.
//! - **[`field_spec`]** — the `"[a,b:number]"` multi-key field convention.
//! - **[`router`]** — history mode and the navigation loading guard.
//! - **[`ResourceSource`]** — a [`DataSource`] over `backoffice-api` list
//!   endpoints.

pub mod error;
pub mod field_spec;
pub mod form;
pub mod router;
pub mod search;
pub mod source;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use field_spec::{Coercion, FieldSpec, FormModel};
pub use form::{
    FieldErrors, Form, FormItem, FormMessage, FormModal, FormNotice, ModalOutcome, Props, Rule,
    SearchHook, Setter, SubmitHandler, SubmitOutcome, SubmitState, Validator,
};
pub use router::{GuardConfig, HISTORY_ENV, HistoryMode, NavigationContext, NavigationGuard, Route, RouteMeta};
pub use search::{SearchConfig, SearchForm, SearchItem, SearchObject, build_search_form};
pub use source::{DataSource, Page, Paging, Record, ResourceSource};
pub use table::{
    DataTable, DataTableBuilder, LoadResult, PageRequest, Pagination, PendingLoad, SourceMode,
    TableConfig, TableData,
};
