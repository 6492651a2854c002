//! Lists the suppliers, items and orders of a running inventory API.
//!
//! Configured through `INVENTORY_API_BASE_URL`, `INVENTORY_API_TIMEOUT_SECS`
//! and `INVENTORY_SESSION_FILE`; see [`ApiConfig`].

use inventory_console::config::ApiConfig;
use inventory_console::endpoints::{ApiEntity, EntityList, ListState};
use inventory_console::framework::FrameworkError;
use inventory_console::lifecycle::{setup_tracing, InventorySystem};
use tracing::{info, info_span, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ApiConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, "Starting inventory console");

    let system = InventorySystem::from_config(&config).map_err(|e| e.to_string())?;

    async {
        let suppliers = system.supplier_client.all_suppliers().await?;
        if let Some(rows) = settle(suppliers).await? {
            for s in &rows {
                info!(
                    id = %s.id,
                    name = %s.supplier_name,
                    email = %s.email,
                    country = %s.country,
                    status = s.status_label(),
                    "Supplier"
                );
            }
        }
        Ok::<_, FrameworkError>(())
    }
    .instrument(info_span!("suppliers"))
    .await
    .map_err(|e| e.to_string())?;

    async {
        let items = system.item_client.all_items().await?;
        if let Some(rows) = settle(items).await? {
            for i in &rows {
                info!(
                    id = %i.id,
                    name = %i.item_name,
                    supplier = i.supplier_name(),
                    stock = i.stock,
                    price = i.price,
                    status = i.status_label(),
                    "Item"
                );
            }
        }
        Ok::<_, FrameworkError>(())
    }
    .instrument(info_span!("items"))
    .await
    .map_err(|e| e.to_string())?;

    async {
        let orders = system.order_client.all_orders().await?;
        if let Some(rows) = settle(orders).await? {
            for o in &rows {
                info!(
                    id = %o.id,
                    date = o.order_day(),
                    item = o.item_name(),
                    supplier = o.supplier_name(),
                    qty = o.qty,
                    price = o.price,
                    total = o.total_price,
                    net = ?o.net_amount,
                    "Order"
                );
            }
        }
        Ok::<_, FrameworkError>(())
    }
    .instrument(info_span!("orders"))
    .await
    .map_err(|e| e.to_string())?;

    system.shutdown().await
}

/// Waits for a list to load. A failed load is logged and yields `None`.
async fn settle<E: ApiEntity>(mut list: EntityList<E>) -> Result<Option<Vec<E>>, FrameworkError> {
    match list.settled().await? {
        ListState::Ready(rows) => {
            info!(entity = E::NAME, count = rows.len(), "Loaded");
            Ok(Some(rows))
        }
        ListState::Failed(e) => {
            warn!(entity = E::NAME, error = %e, "{}", e.user_message(&format!("loading the {}s", E::NAME)));
            Ok(None)
        }
        ListState::Loading => Ok(None),
    }
}
