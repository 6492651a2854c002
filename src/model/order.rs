use super::de;
use super::EntityRef;
use serde::Deserialize;

/// A purchase order, pre-joined with item and supplier names.
///
/// `price`, `total_price` and `net_amount` are computed by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub order_date: String,
    #[serde(rename = "itemId", default)]
    pub item: EntityRef,
    #[serde(rename = "supplierId", default)]
    pub supplier: EntityRef,
    #[serde(default, deserialize_with = "de::number")]
    pub qty: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub net_amount: Option<f64>,
}

impl Order {
    pub fn item_name(&self) -> &str {
        &self.item.name
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier.name
    }

    /// Calendar date part of `order_date` (`2024-03-01T00:00:00Z` -> `2024-03-01`).
    pub fn order_day(&self) -> &str {
        self.order_date
            .split_once('T')
            .map_or(self.order_date.as_str(), |(day, _)| day)
    }
}
