//! Runtime orchestration and lifecycle management.
//!
//! - **System wiring**: Starting the cache actor and handing its client to every endpoint
//! - **Shutdown**: Dropping the clients so the cache loop ends, then joining it
//! - **Observability setup**: Initializing tracing and logging
//!
//! # Main Components
//!
//! - [`InventorySystem`] - Owns the cache task and the entity clients
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::*;
pub use tracing::*;
