use super::{ApiEntity, EndpointClient, EntityEndpoint, EntityList};
use crate::forms::ItemForm;
use crate::framework::{CacheClient, FrameworkError, Tag};
use crate::http::Transport;
use crate::model::{select_options, Item, SelectOption};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

impl ApiEntity for Item {
    type Form = ItemForm;

    const NAME: &'static str = "item";
    const LABEL: &'static str = "Item";
    const TAG: Tag = Tag::ITEM;

    const LIST_ENDPOINT: &'static str = "allItem";
    const LIST_PATH: &'static str = "/v1/item/all_item";
    const ADD_ENDPOINT: &'static str = "addItem";
    const ADD_PATH: &'static str = "/v1/item/add_item";
}

/// Client for the item endpoints. Items are created with a multipart upload.
#[derive(Clone)]
pub struct ItemClient {
    inner: EntityEndpoint<Item>,
}

impl ItemClient {
    pub fn new(cache: CacheClient, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: EntityEndpoint::new(cache, transport),
        }
    }

    pub async fn all_items(&self) -> Result<EntityList<Item>, FrameworkError> {
        self.list().await
    }

    #[instrument(skip(self, form))]
    pub async fn add_item(&self, form: &ItemForm) -> Result<Value, FrameworkError> {
        debug!(?form, "add_item called");
        self.add(form).await
    }

    /// Options for the item dropdown of the order form.
    pub async fn item_options(&self) -> Result<Vec<SelectOption>, FrameworkError> {
        let list = self.list().await?;
        Ok(list
            .state()
            .rows()
            .map(select_options)
            .unwrap_or_default())
    }
}

impl EndpointClient<Item> for ItemClient {
    fn endpoint(&self) -> &EntityEndpoint<Item> {
        &self.inner
    }
}
