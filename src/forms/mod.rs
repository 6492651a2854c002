//! # Entity Forms
//!
//! Create forms for the three entities and the workflow that drives them:
//! edit, validate against a static rule table, submit through the entity's
//! endpoint, then notify.
//!
//! - [`EntityForm`] - A typed FormState with its rule table and wire encoding
//! - [`FormWorkflow`] - The `Closed -> Open -> Submitting` state machine
//! - [`Notifier`] - Transient success/error notifications

pub mod item;
pub mod notify;
pub mod order;
pub mod supplier;
pub mod validation;
pub mod workflow;

pub use item::{ItemField, ItemForm};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use order::{OrderField, OrderForm};
pub use supplier::{SupplierField, SupplierForm};
pub use validation::{FieldErrors, FieldRule, FieldValue, FormField, Minimum, Rule};
pub use workflow::{FormError, FormPhase, FormWorkflow, SubmitOutcome};

use crate::http::RequestBody;
use std::fmt::Debug;

/// Statically-typed FormState of one entity's create form.
pub trait EntityForm: Default + Clone + Debug + PartialEq + Send + Sync + 'static {
    type Field: FormField;

    /// Checked in order on every submit attempt.
    const RULES: &'static [FieldRule<Self::Field>];

    fn value(&self, field: Self::Field) -> FieldValue<'_>;

    /// Wire encoding of the form.
    fn to_body(&self) -> RequestBody;

    fn validate(&self) -> FieldErrors {
        validation::validate(self)
    }
}
