//! # Entity Endpoints
//!
//! Each entity is declared once through [`ApiEntity`] (paths, cache tag, form
//! type) and served by the generic [`EntityEndpoint`], which registers its
//! list query with the cache and runs its add mutation through the transport.
//!
//! The typed clients ([`SupplierClient`], [`ItemClient`], [`OrderClient`])
//! wrap the generic endpoint and expose domain-named methods, so callers never
//! deal with request keys or raw JSON.

pub mod item;
pub mod list;
pub mod order;
pub mod supplier;

pub use item::ItemClient;
pub use list::{EntityList, ListState};
pub use order::OrderClient;
pub use supplier::SupplierClient;

use crate::forms::EntityForm;
use crate::framework::{CacheClient, FrameworkError, QueryDef, RequestKey, Tag};
use crate::http::{ApiRequest, Transport};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Declaration of one remote entity: one list query and one add mutation.
///
/// # Architecture Note
/// The associated `Form` ties each entity to exactly one statically-typed
/// create form, so a `Supplier` endpoint cannot be handed an `ItemForm`.
pub trait ApiEntity: DeserializeOwned + Clone + Send + Sync + 'static {
    /// The create form submitted to [`ADD_PATH`](Self::ADD_PATH).
    type Form: EntityForm;

    /// Lower-case name used in messages ("supplier").
    const NAME: &'static str;
    /// Capitalised name used in notifications ("Supplier").
    const LABEL: &'static str;
    /// Cache tag carried by the list query and invalidated by the add mutation.
    const TAG: Tag;

    const LIST_ENDPOINT: &'static str;
    const LIST_PATH: &'static str;
    const ADD_ENDPOINT: &'static str;
    const ADD_PATH: &'static str;
}

/// Generic list + add operations for one entity.
pub struct EntityEndpoint<E> {
    cache: CacheClient,
    transport: Arc<dyn Transport>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityEndpoint<E> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            transport: self.transport.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: ApiEntity> EntityEndpoint<E> {
    pub fn new(cache: CacheClient, transport: Arc<dyn Transport>) -> Self {
        Self {
            cache,
            transport,
            _entity: PhantomData,
        }
    }

    /// Cache key of the list query. List endpoints take no arguments.
    pub fn list_key() -> RequestKey {
        RequestKey::unit(E::LIST_ENDPOINT)
    }

    /// The list query as registered with the cache.
    pub fn list_query(&self) -> QueryDef {
        let transport = self.transport.clone();
        QueryDef::new(Self::list_key(), move || {
            let transport = transport.clone();
            async move { transport.send(ApiRequest::get(E::LIST_PATH)).await }
        })
        .with_tags([E::TAG])
    }

    /// Subscribes to the entity list, fetching it if needed.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn list(&self) -> Result<EntityList<E>, FrameworkError> {
        debug!("Subscribing to list");
        let subscription = self.cache.query(self.list_query()).await?;
        Ok(EntityList::new(subscription))
    }

    /// Creates one record. On success the entity's list is invalidated.
    #[instrument(skip(self, form), fields(entity = E::NAME))]
    pub async fn add(&self, form: &E::Form) -> Result<Value, FrameworkError> {
        let body = form.to_body();
        let key = RequestKey::new(E::ADD_ENDPOINT, &body.describe())?;
        let transport = self.transport.clone();
        self.cache
            .mutate(
                &key,
                move || async move { transport.send(ApiRequest::post(E::ADD_PATH, body)).await },
                &[E::TAG],
            )
            .await
    }
}

/// Trait for entity-specific clients to inherit the standard operations.
#[async_trait]
pub trait EndpointClient<E: ApiEntity>: Send + Sync {
    /// Access the inner generic endpoint.
    fn endpoint(&self) -> &EntityEndpoint<E>;

    async fn list(&self) -> Result<EntityList<E>, FrameworkError> {
        self.endpoint().list().await
    }

    async fn add(&self, form: &E::Form) -> Result<Value, FrameworkError> {
        self.endpoint().add(form).await
    }

    /// Forces the list to re-fetch, e.g. after an error.
    async fn refetch(&self) -> Result<(), FrameworkError> {
        self.endpoint().cache.refetch(EntityEndpoint::<E>::list_key()).await
    }
}
