//! # Inventory Console
//!
//! > **The client core of an inventory web frontend: suppliers, items and purchase orders.**
//!
//! This crate holds everything a view needs besides rendering: a query/mutation
//! cache that keeps entity lists fresh, an HTTP adapter for the inventory REST
//! API, one endpoint per entity, and the create-form workflow with its
//! validation rules and notifications.
//!
//! ## Core Concepts
//!
//! ### One cache actor
//! [`QueryCache`](framework::QueryCache) owns the `RequestKey -> CacheEntry`
//! table and processes messages sequentially, so at most one fetch per key is
//! ever in flight. Concurrent queries for the same key share that fetch.
//! Mutations run outside the cache and, on success, invalidate a [`Tag`](framework::Tag);
//! every subscribed list carrying the tag re-fetches once.
//!
//! ### Errors are values
//! A non-2xx response or a dropped connection is an [`ApiError`](http::ApiError)
//! stored in the cache entry or returned from the mutation. Forms turn it into
//! a notification; lists render it inline.
//!
//! ### Generics over entities
//! [`EntityEndpoint<E>`](endpoints::EntityEndpoint) and
//! [`FormWorkflow<E>`](forms::FormWorkflow) are written once and instantiated
//! for [`Supplier`](model::Supplier), [`Item`](model::Item) and
//! [`Order`](model::Order) through [`ApiEntity`](endpoints::ApiEntity).
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Request identity, cache entries, coalescing and invalidation.
//! - **Key items**: [`CacheClient`](framework::CacheClient), [`Subscription`](framework::Subscription).
//!
//! ### 2. The Wire ([`http`], [`session`], [`config`])
//! - **Role**: Send requests with bearer auth; JSON or multipart bodies.
//! - **Key items**: [`Transport`](http::Transport), [`HttpClient`](http::HttpClient), [`ApiConfig`](config::ApiConfig).
//!
//! ### 3. The Interface ([`endpoints`], [`model`])
//! - **Role**: Typed list queries and add mutations per entity.
//! - **Key items**: [`SupplierClient`](endpoints::SupplierClient), [`EntityList`](endpoints::EntityList).
//!
//! ### 4. The Forms ([`forms`])
//! - **Role**: FormState, rule tables, submit workflow, toasts.
//! - **Key items**: [`FormWorkflow`](forms::FormWorkflow), [`Notifier`](forms::Notifier).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`InventorySystem`](lifecycle::InventorySystem), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## Running
//!
//! ```bash
//! INVENTORY_API_BASE_URL=http://localhost:5000 RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod config;
pub mod endpoints;
pub mod forms;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod session;
