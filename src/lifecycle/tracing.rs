//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter driven
//! by `RUST_LOG`. Module paths are hidden (`with_target(false)`); the
//! structured fields (`key`, `tags`, `entity`, `status`) carry the context.
//!
//! ```bash
//! RUST_LOG=info cargo run            # fetches, mutations, notifications
//! RUST_LOG=debug cargo run           # plus subscriptions and cache hits
//! RUST_LOG=inventory_console::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info`, adding a supplier while its list is shown reads:
//!
//! ```text
//! INFO submit{entity="supplier"}:add{entity="supplier"}: Mutation ok key=addSupplier({...}) invalidates=[Tag("Supplier")]
//! INFO Invalidated tags=[Tag("Supplier")] stale=1 scheduled=1
//! INFO Fetched key=allSupplier(null)
//! INFO submit{entity="supplier"}: Notify success message=Supplier added successfully!
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
