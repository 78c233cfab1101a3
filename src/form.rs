//! The add/edit transaction form, without any particular UI.
//!
//! A `FormSession` owns the form state: whether it is showing, which transaction is being edited
//! and the raw text of each field. Everything the user sees goes through a `FormView`, which is
//! handed to the session when it is constructed.

use crate::model::{Transaction, TransactionField, DATE_FORMAT};
use crate::store::{KeyValueStore, Store};
use crate::validate::{FieldErrors, RawTransaction, Validator};
use crate::{utils, Result};
use anyhow::{bail, Context};
use tracing::{debug, info, trace, warn};

pub const ADD_TITLE: &str = "Add Transaction";
pub const EDIT_TITLE: &str = "Edit Transaction";
pub const ADDED_NOTICE: &str = "Transaction added!";
pub const UPDATED_NOTICE: &str = "Transaction updated!";

/// The handles a form needs on its surrounding UI.
pub trait FormView {
    fn set_visible(&mut self, visible: bool);

    fn set_title(&mut self, title: &str);

    /// Replaces the text shown in `field`.
    fn set_value(&mut self, field: TransactionField, value: &str);

    /// Shows `message` next to `field` and marks it invalid, or clears both when `None`.
    fn set_error(&mut self, field: TransactionField, message: Option<&str>);

    fn focus(&mut self, field: TransactionField);

    /// Tells the user that a submission went through.
    fn notify(&mut self, message: &str);
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed validation. Nothing was saved and the form stays open.
    Invalid(FieldErrors),
    /// A new transaction was created and saved.
    Added(Transaction),
    /// The transaction being edited was replaced.
    Updated(Transaction),
}

/// The state of one form. Create mode and edit mode differ only in `editing`.
#[derive(Debug)]
pub struct FormSession<V> {
    view: V,
    validator: Validator,
    editing: Option<Transaction>,
    values: RawTransaction,
    visible: bool,
}

impl<V> FormSession<V>
where
    V: FormView,
{
    pub fn new(view: V, validator: Validator) -> Self {
        Self {
            view,
            validator,
            editing: None,
            values: RawTransaction::default(),
            visible: false,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The transaction being edited, `None` in create mode.
    pub fn editing(&self) -> Option<&Transaction> {
        self.editing.as_ref()
    }

    pub fn values(&self) -> &RawTransaction {
        &self.values
    }

    /// Opens the form. With `Some(transaction)` the form edits that transaction and starts from
    /// its values. With `None` the form is empty apart from the date, which defaults to today.
    pub fn show(&mut self, transaction: Option<&Transaction>) {
        self.editing = transaction.cloned();
        match transaction {
            Some(t) => {
                debug!("Editing transaction {}", t.id());
                self.view.set_title(EDIT_TITLE);
                self.values = RawTransaction::default();
                for field in TransactionField::ALL {
                    self.values.set(field, t.field_value(field));
                }
            }
            None => {
                self.view.set_title(ADD_TITLE);
                self.values = RawTransaction {
                    date: self.validator.today().format(DATE_FORMAT).to_string(),
                    ..RawTransaction::default()
                };
            }
        }
        self.render_values();
        self.clear_errors();
        self.visible = true;
        self.view.set_visible(true);
        self.view.focus(TransactionField::Description);
    }

    /// Closes the form and resets its values and error state.
    pub fn hide(&mut self) {
        self.visible = false;
        self.view.set_visible(false);
        self.editing = None;
        self.values = RawTransaction::default();
        self.render_values();
        self.clear_errors();
    }

    /// Records what the user typed into `field`. Nothing is validated until the field is left
    /// (`validate_field`) or the form is submitted.
    pub fn set_value(&mut self, field: TransactionField, value: impl Into<String>) {
        self.values.set(field, value);
    }

    /// Validates one field, the way leaving it would, and shows or clears its message. Returns
    /// `true` if the field is valid.
    pub fn validate_field(&mut self, field: TransactionField) -> bool {
        let message = self
            .validator
            .validate_field(field, self.values.get(field));
        self.view.set_error(field, message);
        message.is_none()
    }

    /// Validates every field and, if they all pass, builds the transaction and saves it into
    /// `store`, then hides the form.
    ///
    /// When a field is invalid, focus moves to the first invalid field in form order and
    /// `SubmitOutcome::Invalid` is returned.
    ///
    /// # Errors
    /// - Returns an error if the store cannot save the transaction. The form stays open.
    /// - Returns an error in edit mode if the transaction is no longer stored. It is not added
    ///   back and the form stays open.
    pub fn submit<K>(&mut self, store: &mut Store<K>) -> Result<SubmitOutcome>
    where
        K: KeyValueStore,
    {
        for field in TransactionField::ALL {
            let _ = self.validate_field(field);
        }
        let draft = match self.validator.parse(&self.values) {
            Ok(draft) => draft,
            Err(errors) => return Ok(self.reject(errors)),
        };

        let now = utils::now();
        match &self.editing {
            Some(existing) => {
                let transaction = existing.replace(draft, now);
                let replaced = store
                    .replace_transaction(transaction.clone())
                    .context("Unable to save the transaction")?;
                if !replaced {
                    warn!("Transaction {} was removed while it was being edited", existing.id());
                    bail!("Transaction not found: '{}'", existing.id())
                }
                info!("Saved transaction {}", transaction.id());
                Ok(self.finish(SubmitOutcome::Updated(transaction), UPDATED_NOTICE))
            }
            None => {
                let transaction =
                    Transaction::create(utils::generate_transaction_id(), draft, now);
                let _ = store
                    .upsert_transaction(transaction.clone())
                    .context("Unable to save the transaction")?;
                info!("Saved transaction {}", transaction.id());
                Ok(self.finish(SubmitOutcome::Added(transaction), ADDED_NOTICE))
            }
        }
    }

    fn finish(&mut self, outcome: SubmitOutcome, notice: &str) -> SubmitOutcome {
        self.hide();
        self.view.notify(notice);
        outcome
    }

    fn reject(&mut self, errors: FieldErrors) -> SubmitOutcome {
        if let Some(field) = errors.first() {
            self.view.focus(field);
        }
        SubmitOutcome::Invalid(errors)
    }

    fn render_values(&mut self) {
        for field in TransactionField::ALL {
            self.view.set_value(field, self.values.get(field));
        }
    }

    fn clear_errors(&mut self) {
        for field in TransactionField::ALL {
            self.view.set_error(field, None);
        }
    }
}

/// A view with no screen behind it. Field messages are logged as warnings, which is how the CLI
/// reports them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogView;

impl FormView for LogView {
    fn set_visible(&mut self, visible: bool) {
        trace!("Form visible: {visible}");
    }

    fn set_title(&mut self, title: &str) {
        debug!("{title}");
    }

    fn set_value(&mut self, field: TransactionField, value: &str) {
        trace!("{field} = {value:?}");
    }

    fn set_error(&mut self, field: TransactionField, message: Option<&str>) {
        if let Some(message) = message {
            warn!("{field}: {message}");
        }
    }

    fn focus(&mut self, _field: TransactionField) {}

    fn notify(&mut self, message: &str) {
        debug!("{message}");
    }
}
