use super::de;
use super::{EntityRef, SelectOption, Selectable};
use serde::Deserialize;

/// An inventory item, pre-joined with its supplier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub item_name: String,
    #[serde(default)]
    pub inventory_location: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "de::number")]
    pub stock: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub discount_price: Option<f64>,
    #[serde(rename = "supplierId", default)]
    pub supplier: EntityRef,
    /// URLs of the uploaded images, first one is the thumbnail.
    #[serde(default)]
    pub item_image: Vec<String>,
    #[serde(default)]
    pub status: bool,
}

impl Item {
    pub fn supplier_name(&self) -> &str {
        &self.supplier.name
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.item_image.first().map(String::as_str)
    }

    pub fn status_label(&self) -> &'static str {
        if self.status {
            "Active"
        } else {
            "In Active"
        }
    }
}

impl Selectable for Item {
    fn select_option(&self) -> SelectOption {
        SelectOption {
            value: self.id.clone(),
            label: self.item_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_joined_item() {
        let item: Item = serde_json::from_value(json!({
            "_id": "i1",
            "itemName": "Bolt",
            "inventoryLocation": "A1",
            "brand": "Bosch",
            "category": "Hardware",
            "stock": "12",
            "price": 2.5,
            "discountPrice": "",
            "supplierId": { "_id": "s1", "supplierName": "Acme" },
            "itemImage": ["https://cdn/x.png"],
            "status": false
        }))
        .unwrap();

        assert_eq!(item.stock, 12.0);
        assert_eq!(item.discount_price, None);
        assert_eq!(item.supplier_name(), "Acme");
        assert_eq!(item.thumbnail(), Some("https://cdn/x.png"));
        assert_eq!(item.status_label(), "In Active");
    }

    #[test]
    fn test_non_numeric_stock_is_rejected() {
        let result: Result<Item, _> = serde_json::from_value(json!({
            "_id": "i1", "itemName": "Bolt", "stock": "lots"
        }));
        assert!(result.is_err());
    }
}
