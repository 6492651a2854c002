use super::{ApiEntity, EndpointClient, EntityEndpoint, EntityList};
use crate::forms::SupplierForm;
use crate::framework::{CacheClient, FrameworkError, Tag};
use crate::http::Transport;
use crate::model::{select_options, SelectOption, Supplier};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

impl ApiEntity for Supplier {
    type Form = SupplierForm;

    const NAME: &'static str = "supplier";
    const LABEL: &'static str = "Supplier";
    const TAG: Tag = Tag::SUPPLIER;

    const LIST_ENDPOINT: &'static str = "allSupplier";
    const LIST_PATH: &'static str = "/v1/supplier/all_supplier";
    const ADD_ENDPOINT: &'static str = "addSupplier";
    const ADD_PATH: &'static str = "/v1/supplier/add_supplier";
}

/// Client for the supplier endpoints.
#[derive(Clone)]
pub struct SupplierClient {
    inner: EntityEndpoint<Supplier>,
}

impl SupplierClient {
    pub fn new(cache: CacheClient, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: EntityEndpoint::new(cache, transport),
        }
    }

    pub async fn all_suppliers(&self) -> Result<EntityList<Supplier>, FrameworkError> {
        self.list().await
    }

    #[instrument(skip(self, form))]
    pub async fn add_supplier(&self, form: &SupplierForm) -> Result<Value, FrameworkError> {
        debug!(?form, "add_supplier called");
        self.add(form).await
    }

    /// Options for the supplier dropdown of the item and order forms. Empty
    /// until the list has loaded.
    pub async fn supplier_options(&self) -> Result<Vec<SelectOption>, FrameworkError> {
        let list = self.list().await?;
        Ok(list
            .state()
            .rows()
            .map(select_options)
            .unwrap_or_default())
    }
}

impl EndpointClient<Supplier> for SupplierClient {
    fn endpoint(&self) -> &EntityEndpoint<Supplier> {
        &self.inner
    }
}
