//! Generic query/mutation cache.
//!
//! This module provides the client-side request cache shared by every entity
//! page: one actor owns the `RequestKey -> CacheEntry` table, coalesces
//! identical in-flight queries and re-fetches tagged queries after mutations.
//!
//! # Main Components
//!
//! - [`QueryCache`] - The actor that owns all cache entries
//! - [`CacheClient`] - Cloneable handle: `query`, `mutate`, `refetch`, `invalidate`
//! - [`Subscription`] - Live view of one entry
//! - [`RequestKey`] / [`Tag`] - Request identity and invalidation groups
//! - [`FrameworkError`] - Cache plumbing errors
//!
//! # Testing
//!
//! See [`mock`] module for a scripted transport to test against without a server.

pub mod core;
pub mod entry;
pub mod error;
pub mod key;
pub mod mock;

// Re-export core types for convenience
pub use self::core::*;
pub use entry::{CacheEntry, QueryStatus};
pub use error::FrameworkError;
pub use key::{RequestKey, Tag};
