use crate::config::ApiConfig;
use crate::endpoints::{EndpointClient, ItemClient, OrderClient, SupplierClient};
use crate::forms::{FormWorkflow, Notifier};
use crate::framework::{CacheClient, QueryCache};
use crate::http::{ApiError, HttpClient, Transport};
use crate::model::{Item, Order, Supplier};
use crate::session::{FileSession, MemorySession, SessionContext};
use std::sync::Arc;
use tracing::{error, info};

/// The running inventory frontend core.
///
/// `InventorySystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the cache actor
/// - **Dependency Wiring**: Handing one cache client and one transport to every endpoint
/// - **Notifications**: Sharing one [`Notifier`] between all forms
///
/// # Example
///
/// ```ignore
/// let system = InventorySystem::from_config(&ApiConfig::from_env()?)?;
///
/// let mut suppliers = system.supplier_client.all_suppliers().await?;
/// let mut form = system.supplier_form();
/// form.open();
/// form.edit(|f| f.supplier_name = "Acme".into())?;
/// form.submit().await?;
///
/// drop(suppliers);
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    pub supplier_client: SupplierClient,
    pub item_client: ItemClient,
    pub order_client: OrderClient,

    /// Raw cache access, for callers that need `snapshot` or `invalidate`.
    pub cache: CacheClient,

    /// Success and error toasts from every form.
    pub notifier: Notifier,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl InventorySystem {
    /// Starts the cache actor and wires the entity clients over `transport`.
    pub fn new(transport: Arc<dyn Transport>, buffer_size: usize) -> Self {
        let (cache_actor, cache) = QueryCache::new(buffer_size);
        let cache_handle = tokio::spawn(cache_actor.run());

        Self {
            supplier_client: SupplierClient::new(cache.clone(), transport.clone()),
            item_client: ItemClient::new(cache.clone(), transport.clone()),
            order_client: OrderClient::new(cache.clone(), transport),
            cache,
            notifier: Notifier::default(),
            handles: vec![cache_handle],
        }
    }

    /// Builds the HTTP transport and session from `config`, then starts the
    /// system. A configured session file is re-read on every request.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let session: Arc<dyn SessionContext> = match &config.session_file {
            Some(path) => Arc::new(FileSession::new(path)),
            None => Arc::new(MemorySession::new()),
        };
        let http = HttpClient::new(config, session)?;
        info!(base_url = %config.base_url, "Inventory API client ready");
        Ok(Self::new(Arc::new(http), config.channel_capacity))
    }

    pub fn supplier_form(&self) -> FormWorkflow<Supplier> {
        FormWorkflow::new(self.supplier_client.endpoint().clone(), self.notifier.clone())
    }

    pub fn item_form(&self) -> FormWorkflow<Item> {
        FormWorkflow::new(self.item_client.endpoint().clone(), self.notifier.clone())
    }

    pub fn order_form(&self) -> FormWorkflow<Order> {
        FormWorkflow::new(self.order_client.endpoint().clone(), self.notifier.clone())
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the clients closes the cache channel once every other
    /// `CacheClient`, [`Subscription`](crate::framework::Subscription) and
    /// form has been dropped too; the cache loop then exits and is joined.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the cache task shut down cleanly
    /// - `Err(String)` if it panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.supplier_client);
        drop(self.item_client);
        drop(self.order_client);
        drop(self.cache);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Cache task failed: {:?}", e);
                return Err(format!("Cache task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
