// Dialog wrapper used by the table's create and modify flows.

use tracing::debug;

use super::{FieldErrors, Form, FormItem, FormMessage, SubmitHandler, SubmitOutcome};
use crate::error::CoreError;
use crate::field_spec::FormModel;
use crate::source::Record;

#[derive(Debug, Clone, PartialEq)]
pub enum ModalOutcome {
    /// The form was invalid; the modal stays open.
    Invalid(FieldErrors),
    /// The handler succeeded and the modal closed.
    Submitted,
}

/// A form shown in a dialog.
#[derive(Debug, Clone)]
pub struct FormModal {
    title: Option<String>,
    form: Form,
    visible: bool,
}

impl FormModal {
    pub fn new(items: Vec<FormItem>) -> Self {
        Self {
            title: None,
            form: Form::new(items, FormModel::new()),
            visible: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Show the dialog, loading `row` into the form when given (modify)
    /// or restoring the initial model otherwise (create).
    pub fn open(&mut self, row: Option<&Record>) {
        match row {
            Some(row) => {
                self.form.update(FormMessage::SetModel(row.clone()));
            }
            None => {
                self.form.update(FormMessage::Reset);
            }
        }
        self.form.clear_validation();
        self.visible = true;
        debug!(title = ?self.title, "modal opened");
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Submit the form, closing the dialog on success.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<ModalOutcome, CoreError>
    where
        H: SubmitHandler + ?Sized,
    {
        match self.form.submit(handler).await? {
            SubmitOutcome::Invalid(errors) => Ok(ModalOutcome::Invalid(errors)),
            SubmitOutcome::Submitted => {
                self.close();
                Ok(ModalOutcome::Submitted)
            }
        }
    }
}
