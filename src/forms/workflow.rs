//! # Form Workflow
//!
//! One create form instance:
//!
//! ```text
//! Closed --open--> Open --submit--> (validate) --ok--> Submitting --success--> Closed
//!                   ^                   |                   |
//!                   +----- invalid -----+------ failure ----+
//! ```
//!
//! Edits only touch the FormState. Validation runs on every submit attempt and
//! blocks the request when any rule fails. Server and network failures become
//! an error notification and leave the FormState as the user typed it.

use super::{EntityForm, FieldErrors, Notifier};
use crate::endpoints::{ApiEntity, EntityEndpoint};
use crate::framework::FrameworkError;
use crate::http::ApiError;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The record was created and the form closed.
    Created(Value),
    /// The request failed; the form is open with its values intact.
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Form is not open")]
    NotOpen,
    #[error(transparent)]
    Framework(#[from] FrameworkError),
}

/// The create form of entity `E`.
pub struct FormWorkflow<E: ApiEntity> {
    endpoint: EntityEndpoint<E>,
    notifier: Notifier,
    phase: FormPhase,
    values: E::Form,
    errors: FieldErrors,
}

impl<E: ApiEntity> FormWorkflow<E> {
    pub fn new(endpoint: EntityEndpoint<E>, notifier: Notifier) -> Self {
        Self {
            endpoint,
            notifier,
            phase: FormPhase::Closed,
            values: E::Form::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == FormPhase::Open
    }

    pub fn values(&self) -> &E::Form {
        &self.values
    }

    /// Errors from the last validation, for display next to each field.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Opens the form with empty values. Opening an open form keeps its state.
    pub fn open(&mut self) {
        if self.phase == FormPhase::Closed {
            self.values = E::Form::default();
            self.errors = FieldErrors::new();
            self.phase = FormPhase::Open;
            debug!(entity = E::NAME, "Form opened");
        }
    }

    /// Applies a user edit.
    pub fn edit(&mut self, change: impl FnOnce(&mut E::Form)) -> Result<(), FormError> {
        if self.phase != FormPhase::Open {
            return Err(FormError::NotOpen);
        }
        change(&mut self.values);
        Ok(())
    }

    /// Discards the FormState and closes the form.
    pub fn cancel(&mut self) {
        self.values = E::Form::default();
        self.errors = FieldErrors::new();
        self.phase = FormPhase::Closed;
    }

    /// Runs the rule table and keeps the result for display.
    pub fn validate(&mut self) -> &FieldErrors {
        self.errors = self.values.validate();
        &self.errors
    }

    /// Validates and, when clean, sends the form through the entity's add
    /// mutation. Expected failures come back as [`SubmitOutcome`] values;
    /// `Err` means the form was not open or the cache is gone.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if self.phase != FormPhase::Open {
            return Err(FormError::NotOpen);
        }

        if !self.validate().is_empty() {
            debug!(errors = self.errors.len(), "Submit blocked by validation");
            return Ok(SubmitOutcome::Invalid(self.errors.clone()));
        }

        self.phase = FormPhase::Submitting;
        match self.endpoint.add(&self.values).await {
            Ok(created) => {
                info!("Created");
                self.notifier
                    .success(format!("{} added successfully!", E::LABEL));
                self.cancel();
                Ok(SubmitOutcome::Created(created))
            }
            Err(FrameworkError::Api(e)) => {
                self.notifier
                    .error(e.user_message(&format!("adding the {}", E::NAME)));
                self.phase = FormPhase::Open;
                Ok(SubmitOutcome::Failed(e))
            }
            Err(e) => {
                self.phase = FormPhase::Open;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{NotificationLevel, SupplierForm};
    use crate::framework::mock::MockTransport;
    use crate::framework::QueryCache;
    use crate::model::Supplier;
    use serde_json::json;
    use std::sync::Arc;

    fn workflow(mock: &Arc<MockTransport>) -> (FormWorkflow<Supplier>, Notifier) {
        let (cache, client) = QueryCache::new(8);
        tokio::spawn(cache.run());
        let notifier = Notifier::default();
        let endpoint = EntityEndpoint::new(client, mock.clone());
        (FormWorkflow::new(endpoint, notifier.clone()), notifier)
    }

    fn fill(form: &mut SupplierForm) {
        form.supplier_name = "Acme".into();
        form.address = "1 Main St".into();
        form.email = "a@b.com".into();
        form.phone = "1234567890".into();
        form.tax_no = "T1".into();
        form.country = "US".into();
    }

    #[tokio::test]
    async fn test_closed_form_rejects_edits_and_submit() {
        let mock = Arc::new(MockTransport::new());
        let (mut form, _) = workflow(&mock);

        assert_eq!(form.edit(fill), Err(FormError::NotOpen));
        assert_eq!(form.submit().await, Err(FormError::NotOpen));
        mock.verify();
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let mock = Arc::new(MockTransport::new());
        let (mut form, _) = workflow(&mock);
        form.open();
        form.edit(|f| f.supplier_name = "Acme".into()).unwrap();

        let outcome = form.submit().await.unwrap();
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation errors");
        };
        assert!(!errors.contains("supplierName"));
        assert!(errors.contains("country"));
        assert_eq!(form.phase(), FormPhase::Open);
        assert_eq!(form.errors(), &errors);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_success_closes_and_resets() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_post("/v1/supplier/add_supplier").return_ok(json!({ "message": "ok" }));
        let (mut form, notifier) = workflow(&mock);
        let mut toasts = notifier.subscribe();

        form.open();
        form.edit(fill).unwrap();
        let outcome = form.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Created(json!({ "message": "ok" })));
        assert_eq!(form.phase(), FormPhase::Closed);
        assert_eq!(form.values(), &SupplierForm::default());
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, NotificationLevel::Success);
        assert_eq!(toast.message, "Supplier added successfully!");
        mock.verify();
    }

    #[tokio::test]
    async fn test_server_error_keeps_values() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_post("/v1/supplier/add_supplier").return_err(ApiError::Http {
            status_code: 500,
            message: "stack trace".into(),
        });
        let (mut form, notifier) = workflow(&mock);
        let mut toasts = notifier.subscribe();

        form.open();
        form.edit(fill).unwrap();
        let before = form.values().clone();
        let outcome = form.submit().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(form.phase(), FormPhase::Open);
        assert_eq!(form.values(), &before);
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, NotificationLevel::Error);
        assert_eq!(toast.message, "An error occurred while adding the supplier.");
        mock.verify();
    }

    #[tokio::test]
    async fn test_cancel_discards_values() {
        let mock = Arc::new(MockTransport::new());
        let (mut form, _) = workflow(&mock);
        form.open();
        form.edit(fill).unwrap();
        form.cancel();
        form.open();
        assert_eq!(form.values(), &SupplierForm::default());
        assert!(form.errors().is_empty());
    }
}
