//! Typed view over a list query's cache entry.

use super::ApiEntity;
use crate::framework::{CacheEntry, FrameworkError, Subscription};
use crate::http::ApiError;
use crate::model::ListEnvelope;
use serde_json::Value;
use std::marker::PhantomData;

/// What a table renders: a spinner, an inline error, or its rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<E> {
    Loading,
    Failed(ApiError),
    Ready(Vec<E>),
}

impl<E> ListState<E> {
    pub fn rows(&self) -> Option<&[E]> {
        match self {
            ListState::Ready(rows) => Some(rows),
            _ => None,
        }
    }
}

/// A subscription to an entity list, decoding rows on demand.
#[derive(Debug)]
pub struct EntityList<E> {
    subscription: Subscription,
    _entity: PhantomData<fn() -> E>,
}

impl<E: ApiEntity> EntityList<E> {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription,
            _entity: PhantomData,
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn entry(&self) -> CacheEntry {
        self.subscription.current()
    }

    /// Current state. A failed fetch shows as `Failed` even when older rows
    /// are cached; a re-fetch in progress keeps showing the cached rows.
    pub fn state(&self) -> ListState<E> {
        Self::state_of(&self.subscription.current())
    }

    /// Waits for the list to finish loading.
    pub async fn settled(&mut self) -> Result<ListState<E>, FrameworkError> {
        let entry = self.subscription.settled().await?;
        Ok(Self::state_of(&entry))
    }

    /// Waits for the next transition of the underlying entry.
    pub async fn changed(&mut self) -> Result<CacheEntry, FrameworkError> {
        self.subscription.changed().await
    }

    pub async fn refetch(&self) -> Result<(), FrameworkError> {
        self.subscription.refetch().await
    }

    fn state_of(entry: &CacheEntry) -> ListState<E> {
        if let (true, Some(error)) = (entry.is_error(), &entry.error) {
            return ListState::Failed(error.clone());
        }
        match &entry.data {
            Some(data) => match decode(data) {
                Ok(rows) => ListState::Ready(rows),
                Err(e) => ListState::Failed(e),
            },
            None => ListState::Loading,
        }
    }
}

fn decode<E: ApiEntity>(data: &Value) -> Result<Vec<E>, ApiError> {
    serde_json::from_value::<ListEnvelope<E>>(data.clone())
        .map(|envelope| envelope.data)
        .map_err(|e| ApiError::Decode(e.to_string()))
}
