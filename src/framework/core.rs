//! # Core Query Cache
//!
//! This module defines the client-side request cache that every entity list
//! and every create form goes through.
//!
//! ## Key Types
//!
//! - [`QueryCache`]: The actor that owns the `RequestKey -> CacheEntry` table.
//! - [`CacheClient`]: The cloneable handle used to query, mutate and invalidate.
//! - [`Subscription`]: A live view of one entry; dropping it unsubscribes.
//! - [`QueryDef`]: A key, its tags and the fetcher that produces its data.

use crate::framework::entry::{CacheEntry, QueryStatus};
use crate::framework::error::FrameworkError;
use crate::framework::key::{RequestKey, Tag};
use crate::http::ApiError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

// =============================================================================
// 1. QUERY DEFINITIONS
// =============================================================================

/// Boxed future returned by a fetcher.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Value, ApiError>> + Send>>;

/// A repeatable request. The cache keeps it so it can re-run the query on
/// `refetch` and on tag invalidation.
pub type Fetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Everything the cache needs to run a query: identity, tags and fetcher.
#[derive(Clone)]
pub struct QueryDef {
    pub key: RequestKey,
    pub tags: Vec<Tag>,
    pub fetcher: Fetcher,
}

impl QueryDef {
    pub fn new<F, Fut>(key: RequestKey, fetcher: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        Self {
            key,
            tags: Vec::new(),
            fetcher: Arc::new(move || Box::pin(fetcher())),
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

impl fmt::Debug for QueryDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDef")
            .field("key", &self.key)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// 2. MESSAGES
// =============================================================================

/// Type alias for the one-shot response channel used by the cache actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Requests processed by the [`QueryCache`] actor, one at a time.
#[derive(Debug)]
pub enum CacheRequest {
    Query {
        def: QueryDef,
        respond_to: Response<watch::Receiver<CacheEntry>>,
    },
    Refetch {
        key: RequestKey,
        respond_to: Response<()>,
    },
    Invalidate {
        tags: Vec<Tag>,
        respond_to: Response<usize>,
    },
    Snapshot {
        key: RequestKey,
        respond_to: Response<CacheEntry>,
    },
}

/// Completion report sent back to the actor by a fetch task.
struct FetchDone {
    key: RequestKey,
    result: Result<Value, ApiError>,
}

// =============================================================================
// 3. THE CACHE ACTOR
// =============================================================================

struct Slot {
    state: watch::Sender<CacheEntry>,
    fetcher: Fetcher,
    tags: Vec<Tag>,
    stale: bool,
    in_flight: bool,
    refetch_pending: bool,
}

impl Slot {
    fn new(def: &QueryDef) -> Self {
        let (state, _) = watch::channel(CacheEntry::default());
        Self {
            state,
            fetcher: def.fetcher.clone(),
            tags: def.tags.clone(),
            stale: false,
            in_flight: false,
            refetch_pending: false,
        }
    }

    fn has_subscribers(&self) -> bool {
        self.state.receiver_count() > 0
    }
}

/// The actor that owns every [`CacheEntry`].
///
/// **Concurrency Model**:
/// Fetches run in their own tasks, but every state transition (start, finish,
/// invalidate) is applied by this actor while it processes one message at a
/// time. That is what guarantees at most one in-flight fetch per key: a second
/// `query` for a key that is already loading just subscribes to the same
/// entry, and a `refetch` or invalidation that lands mid-flight is recorded as
/// a single follow-up fetch.
pub struct QueryCache {
    receiver: mpsc::Receiver<CacheRequest>,
    done_tx: mpsc::UnboundedSender<FetchDone>,
    done_rx: mpsc::UnboundedReceiver<FetchDone>,
    slots: HashMap<RequestKey, Slot>,
}

impl QueryCache {
    /// Creates the actor and its client. The actor does nothing until
    /// [`run`](Self::run) is spawned.
    pub fn new(buffer_size: usize) -> (Self, CacheClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            done_tx,
            done_rx,
            slots: HashMap::new(),
        };
        (actor, CacheClient::new(sender))
    }

    /// Runs the event loop until every [`CacheClient`] is dropped.
    pub async fn run(mut self) {
        info!("Cache started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                Some(done) = self.done_rx.recv() => self.complete(done),
            }
        }

        info!(size = self.slots.len(), "Shutdown");
    }

    fn handle(&mut self, msg: CacheRequest) {
        match msg {
            CacheRequest::Query { def, respond_to } => {
                let key = def.key.clone();
                let slot = self.slots.entry(key.clone()).or_insert_with(|| Slot::new(&def));
                slot.fetcher = def.fetcher;
                slot.tags = def.tags;

                let receiver = slot.state.subscribe();
                let needs_fetch = slot.stale || slot.state.borrow().status == QueryStatus::Idle;
                debug!(%key, needs_fetch, subscribers = slot.state.receiver_count(), "Query");

                if needs_fetch && !self.spawn_fetch(&key) {
                    // Stale while a fetch is running: the running fetch may
                    // predate the invalidation, so queue one more.
                    if let Some(slot) = self.slots.get_mut(&key) {
                        slot.refetch_pending = true;
                    }
                }
                let _ = respond_to.send(Ok(receiver));
            }
            CacheRequest::Refetch { key, respond_to } => {
                if !self.slots.contains_key(&key) {
                    warn!(%key, "Refetch of unknown key");
                    let _ = respond_to.send(Err(FrameworkError::UnknownKey(key.to_string())));
                    return;
                }
                if !self.spawn_fetch(&key) {
                    debug!(%key, "Refetch queued behind in-flight fetch");
                    if let Some(slot) = self.slots.get_mut(&key) {
                        slot.refetch_pending = true;
                    }
                }
                let _ = respond_to.send(Ok(()));
            }
            CacheRequest::Invalidate { tags, respond_to } => {
                let matching: Vec<RequestKey> = self
                    .slots
                    .iter()
                    .filter(|(_, slot)| slot.tags.iter().any(|t| tags.contains(t)))
                    .map(|(key, _)| key.clone())
                    .collect();

                let mut scheduled = 0;
                for key in &matching {
                    let Some(slot) = self.slots.get_mut(key) else { continue };
                    slot.stale = true;
                    if !slot.has_subscribers() {
                        continue;
                    }
                    if slot.in_flight {
                        slot.refetch_pending = true;
                    } else {
                        self.spawn_fetch(key);
                    }
                    scheduled += 1;
                }

                info!(?tags, stale = matching.len(), scheduled, "Invalidated");
                let _ = respond_to.send(Ok(scheduled));
            }
            CacheRequest::Snapshot { key, respond_to } => {
                let entry = self
                    .slots
                    .get(&key)
                    .map(|slot| slot.state.borrow().clone())
                    .unwrap_or_default();
                let _ = respond_to.send(Ok(entry));
            }
        }
    }

    /// Starts a fetch for `key` unless one is already running.
    ///
    /// Returns `false` when the key is unknown or already in flight.
    fn spawn_fetch(&mut self, key: &RequestKey) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            return false;
        };
        if slot.in_flight {
            return false;
        }
        slot.state.send_modify(CacheEntry::begin_fetch);
        self.launch(key);
        true
    }

    fn launch(&mut self, key: &RequestKey) {
        let Some(slot) = self.slots.get_mut(key) else {
            return;
        };
        slot.in_flight = true;
        slot.stale = false;

        let fetch = (slot.fetcher)();
        let done = self.done_tx.clone();
        let key = key.clone();
        debug!(%key, "Fetch started");
        tokio::spawn(async move {
            let result = fetch.await;
            let _ = done.send(FetchDone { key, result });
        });
    }

    fn complete(&mut self, done: FetchDone) {
        let FetchDone { key, result } = done;
        let Some(slot) = self.slots.get_mut(&key) else {
            return;
        };
        slot.in_flight = false;

        match &result {
            Ok(_) => info!(%key, "Fetched"),
            Err(e) => warn!(%key, error = %e, "Fetch failed"),
        }

        let follow_up = std::mem::take(&mut slot.refetch_pending);
        slot.state.send_modify(|entry| {
            entry.complete(result);
            if follow_up {
                entry.begin_fetch();
            }
        });
        if follow_up {
            self.launch(&key);
        }
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// A cloneable handle to the [`QueryCache`] actor.
#[derive(Clone)]
pub struct CacheClient {
    sender: mpsc::Sender<CacheRequest>,
}

impl CacheClient {
    pub fn new(sender: mpsc::Sender<CacheRequest>) -> Self {
        Self { sender }
    }

    /// Subscribes to `def.key`, fetching it if the entry is missing or stale.
    ///
    /// Concurrent calls for the same key share a single fetch.
    pub async fn query(&self, def: QueryDef) -> Result<Subscription, FrameworkError> {
        let key = def.key.clone();
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Query { def, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        let receiver = response.await.map_err(|_| FrameworkError::ActorDropped)??;
        Ok(Subscription {
            key,
            receiver,
            cache: self.clone(),
        })
    }

    /// Re-runs the fetcher for `key` regardless of staleness.
    pub async fn refetch(&self, key: RequestKey) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Refetch { key, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Marks every entry carrying one of `tags` stale and re-fetches the
    /// subscribed ones. Returns how many fetches were scheduled.
    pub async fn invalidate(&self, tags: Vec<Tag>) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Invalidate { tags, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Current state of `key`; an unknown key reads as `Idle`.
    pub async fn snapshot(&self, key: RequestKey) -> Result<CacheEntry, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Snapshot { key, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Runs a mutation exactly once. Mutations are never coalesced.
    ///
    /// On success the `invalidates` tags are applied before this returns. On
    /// failure the cache is left untouched and the error comes back as
    /// [`FrameworkError::Api`].
    pub async fn mutate<F, Fut>(
        &self,
        key: &RequestKey,
        fetcher: F,
        invalidates: &[Tag],
    ) -> Result<Value, FrameworkError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        debug!(%key, "Mutation started");
        match fetcher().await {
            Ok(value) => {
                info!(%key, ?invalidates, "Mutation ok");
                if !invalidates.is_empty() {
                    self.invalidate(invalidates.to_vec()).await?;
                }
                Ok(value)
            }
            Err(e) => {
                warn!(%key, error = %e, "Mutation failed");
                Err(FrameworkError::Api(e))
            }
        }
    }
}

/// A live view of one cache entry.
///
/// Every subscriber of a key sees the same state; updates arrive through
/// [`changed`](Self::changed) and [`settled`](Self::settled).
pub struct Subscription {
    key: RequestKey,
    receiver: watch::Receiver<CacheEntry>,
    cache: CacheClient,
}

impl Subscription {
    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    pub fn current(&self) -> CacheEntry {
        self.receiver.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.receiver.borrow().is_loading()
    }

    pub fn data(&self) -> Option<Value> {
        self.receiver.borrow().data.clone()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.receiver.borrow().error.clone()
    }

    /// Waits for the next state transition.
    pub async fn changed(&mut self) -> Result<CacheEntry, FrameworkError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Waits until the entry is `Success` or `Error`.
    pub async fn settled(&mut self) -> Result<CacheEntry, FrameworkError> {
        let entry = self
            .receiver
            .wait_for(CacheEntry::is_settled)
            .await
            .map_err(|_| FrameworkError::ActorClosed)?
            .clone();
        Ok(entry)
    }

    pub async fn refetch(&self) -> Result<(), FrameworkError> {
        self.cache.refetch(self.key.clone()).await
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("entry", &*self.receiver.borrow())
            .finish()
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn start() -> CacheClient {
        let (actor, client) = QueryCache::new(16);
        tokio::spawn(actor.run());
        client
    }

    /// A fetcher that counts calls and consumes one permit per fetch.
    fn gated(calls: Arc<AtomicUsize>, gate: Arc<Semaphore>) -> QueryDef {
        QueryDef::new(RequestKey::unit("allSupplier"), move || {
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                gate.acquire()
                    .await
                    .map_err(|e| ApiError::Transport(e.to_string()))?
                    .forget();
                Ok::<_, ApiError>(json!({ "data": [], "fetch": n }))
            }
        })
        .with_tags([Tag::SUPPLIER])
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_one_fetch() {
        let cache = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let mut first = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        let mut second = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        assert!(first.is_loading());
        assert!(second.is_loading());

        gate.add_permits(10);
        let a = first.settled().await.unwrap();
        let b = second.settled().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, b);
        assert_eq!(a.data, Some(json!({ "data": [], "fetch": 1 })));
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_fetch() {
        let cache = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(10));

        let mut first = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        first.settled().await.unwrap();
        let second = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();

        assert!(second.current().is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_while_in_flight_runs_once_more() {
        let cache = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let mut sub = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        sub.refetch().await.unwrap();
        sub.refetch().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        gate.add_permits(10);
        let entry = sub.settled().await.unwrap();
        assert_eq!(entry.data, Some(json!({ "data": [], "fetch": 2 })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidation_without_subscribers_defers_fetch() {
        let cache = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let mut sub = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        gate.add_permits(1);
        sub.settled().await.unwrap();
        drop(sub);

        let scheduled = cache.invalidate(vec![Tag::SUPPLIER]).await.unwrap();
        assert_eq!(scheduled, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The stale entry is re-fetched when the next subscriber arrives.
        let mut sub = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        assert!(sub.is_loading());
        assert!(sub.data().is_some());
        gate.add_permits(1);
        let entry = sub.settled().await.unwrap();
        assert_eq!(entry.data, Some(json!({ "data": [], "fetch": 2 })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidation_ignores_other_tags() {
        let cache = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(10));

        let mut sub = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        sub.settled().await.unwrap();

        let scheduled = cache.invalidate(vec![Tag::ORDER]).await.unwrap();
        assert_eq!(scheduled, 0);
        assert!(sub.current().is_success());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_untouched() {
        let cache = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(10));

        let mut sub = cache.query(gated(calls.clone(), gate.clone())).await.unwrap();
        sub.settled().await.unwrap();

        let key = RequestKey::unit("addSupplier");
        let result = cache
            .mutate(
                &key,
                || async {
                    Err(ApiError::Http {
                        status_code: 400,
                        message: "Duplicate".into(),
                    })
                },
                &[Tag::SUPPLIER],
            )
            .await;

        assert!(matches!(result, Err(FrameworkError::Api(ApiError::Http { status_code: 400, .. }))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sub.current().status, QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_mutations_are_not_coalesced() {
        let cache = start();
        let key = RequestKey::unit("addSupplier");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .mutate(
                    &key,
                    || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(json!({}))
                    },
                    &[],
                )
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_refetch_unknown_key() {
        let cache = start();
        let result = cache.refetch(RequestKey::unit("nothing")).await;
        assert!(matches!(result, Err(FrameworkError::UnknownKey(_))));
        let entry = cache.snapshot(RequestKey::unit("nothing")).await.unwrap();
        assert_eq!(entry.status, QueryStatus::Idle);
    }
}
