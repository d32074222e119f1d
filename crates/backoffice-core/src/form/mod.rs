// ── Form orchestration ──
//
// A `Form` owns its model, item descriptors, validation errors and submit
// state. Hosts never mutate the model directly: renderers send
// `FormMessage`s through `update`, and the form answers with a
// `FormNotice` the host forwards outward (model changes, search requests).

mod item;
mod modal;
mod rules;

use std::future::Future;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

pub use item::{FormItem, Props, SearchHook, Setter};
pub use modal::{FormModal, ModalOutcome};
pub use rules::{Rule, Validator, is_empty_value};

use crate::error::CoreError;
use crate::field_spec::{self, FormModel};
use crate::source::Record;

/// Per-field validation messages, in item order.
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Lifecycle of the most recent submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubmitState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Events a renderer (or host) sends to a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMessage {
    /// A control changed its field's raw value.
    Change { field: String, value: Value },
    /// Load a flat record into the model (decoding multi-key fields).
    SetModel(Record),
    /// Restore the initial model and drop validation errors.
    Reset,
    ClearValidation,
    /// The search icon of a field was clicked.
    Search { field: String },
    /// Enter was pressed in a field.
    PressEnter { field: String },
}

/// What a form tells its host after handling a message.
#[derive(Debug, Clone, PartialEq)]
pub enum FormNotice {
    /// The raw model changed; hosts mirroring it should replace their copy.
    ModelChanged(FormModel),
    /// A search trigger bound to `Reload` fired.
    SearchRequested { field: String },
}

/// Result of [`Form::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the handler was not called.
    Invalid(FieldErrors),
    Submitted,
}

/// Async submit callback, given the encoded model and the item list.
pub trait SubmitHandler: Send + Sync {
    fn submit(&self, model: Record, items: Vec<FormItem>) -> BoxFuture<'static, Result<(), CoreError>>;
}

impl<F, Fut> SubmitHandler for F
where
    F: Fn(Record, Vec<FormItem>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
{
    fn submit(&self, model: Record, items: Vec<FormItem>) -> BoxFuture<'static, Result<(), CoreError>> {
        Box::pin(self(model, items))
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    items: Vec<FormItem>,
    model: FormModel,
    initial: FormModel,
    errors: FieldErrors,
    state: SubmitState,
}

impl Form {
    /// Build a form. Every non-submit item gets a model slot, seeded from
    /// its initial value unless `model` already has one.
    pub fn new(items: Vec<FormItem>, mut model: FormModel) -> Self {
        seed_model(&items, &mut model);
        Self {
            items,
            initial: model.clone(),
            model,
            errors: FieldErrors::new(),
            state: SubmitState::Idle,
        }
    }

    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [FormItem] {
        &mut self.items
    }

    pub fn item(&self, field: &str) -> Option<&FormItem> {
        self.items.iter().find(|item| item.field == field)
    }

    /// The raw model, with multi-key fields as positional arrays.
    pub fn model(&self) -> &FormModel {
        &self.model
    }

    /// The model flattened into a record (getModel).
    pub fn get_model(&self) -> Record {
        field_spec::encode(&self.model)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    // ── Message handling ─────────────────────────────────────────────

    pub fn update(&mut self, message: FormMessage) -> Option<FormNotice> {
        match message {
            FormMessage::Change { field, value } => {
                self.model.insert(field, value);
                Some(FormNotice::ModelChanged(self.model.clone()))
            }
            FormMessage::SetModel(record) => {
                self.model = field_spec::decode(&self.model, &record);
                Some(FormNotice::ModelChanged(self.model.clone()))
            }
            FormMessage::Reset => {
                self.model = self.initial.clone();
                self.errors.clear();
                self.state = SubmitState::Idle;
                Some(FormNotice::ModelChanged(self.model.clone()))
            }
            FormMessage::ClearValidation => {
                self.clear_validation();
                None
            }
            FormMessage::Search { field } => self.trigger(field, |item| item.on_search),
            FormMessage::PressEnter { field } => self.trigger(field, |item| item.on_press_enter),
        }
    }

    fn trigger(
        &self,
        field: String,
        hook: impl Fn(&FormItem) -> Option<SearchHook>,
    ) -> Option<FormNotice> {
        match self.item(&field).and_then(hook) {
            Some(SearchHook::Reload) => Some(FormNotice::SearchRequested { field }),
            Some(SearchHook::Noop) | None => None,
        }
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Run every rule against the raw model. Returns `true` when valid.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for item in &self.items {
            let value = self.model.get(&item.field).unwrap_or(&Value::Null);
            let messages: Vec<String> = item
                .rules
                .iter()
                .filter_map(|rule| rule.check(item.display_name(), value, &self.model))
                .collect();
            if !messages.is_empty() {
                self.errors.insert(item.field.clone(), messages);
            }
        }
        self.errors.is_empty()
    }

    pub fn clear_validation(&mut self) {
        self.errors.clear();
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate, then hand the encoded model to `handler`.
    ///
    /// An invalid form never reaches the handler. Handler errors are
    /// returned as-is and leave the form in [`SubmitState::Failed`].
    pub async fn submit<H>(&mut self, handler: &H) -> Result<SubmitOutcome, CoreError>
    where
        H: SubmitHandler + ?Sized,
    {
        self.state = SubmitState::Validating;
        if !self.validate() {
            debug!(fields = self.errors.len(), "submit blocked by validation");
            self.state = SubmitState::Idle;
            return Ok(SubmitOutcome::Invalid(self.errors.clone()));
        }

        self.state = SubmitState::Submitting;
        match handler.submit(self.get_model(), self.items.clone()).await {
            Ok(()) => {
                self.state = SubmitState::Succeeded;
                Ok(SubmitOutcome::Submitted)
            }
            Err(e) => {
                debug!(error = %e, "submit handler failed");
                self.state = SubmitState::Failed;
                Err(e)
            }
        }
    }
}

pub(crate) fn seed_model(items: &[FormItem], model: &mut FormModel) {
    for item in items.iter().filter(|item| !item.is_submit()) {
        if !model.contains_key(&item.field) {
            model.insert(
                item.field.clone(),
                item.value.clone().unwrap_or(Value::Null),
            );
        }
    }
}
