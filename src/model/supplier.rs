use super::de;
use super::{SelectOption, Selectable};
use serde::Deserialize;

/// A supplier as listed by `GET /v1/supplier/all_supplier`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub supplier_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(default)]
    pub tax_no: String,
    #[serde(default)]
    pub country: String,
    /// Server-assigned running number.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub supplier_no: Option<String>,
    #[serde(default)]
    pub status: bool,
}

impl Supplier {
    pub fn status_label(&self) -> &'static str {
        if self.status {
            "Active"
        } else {
            "Inactive"
        }
    }
}

impl Selectable for Supplier {
    fn select_option(&self) -> SelectOption {
        SelectOption {
            value: self.id.clone(),
            label: self.supplier_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{select_options, ListEnvelope};
    use serde_json::json;

    #[test]
    fn test_decode_supplier_list() {
        let body = json!({
            "data": [{
                "_id": "65f0",
                "supplierName": "Acme",
                "address": "1 Main St",
                "email": "a@b.com",
                "phone": 1234567890u64,
                "taxNo": "T1",
                "country": "United States",
                "supplierNo": 7,
                "status": true
            }]
        });

        let list: ListEnvelope<Supplier> = serde_json::from_value(body).unwrap();
        let supplier = &list.data[0];
        assert_eq!(supplier.id, "65f0");
        assert_eq!(supplier.phone.as_deref(), Some("1234567890"));
        assert_eq!(supplier.supplier_no.as_deref(), Some("7"));
        assert_eq!(supplier.status_label(), "Active");

        let options = select_options(&list.data);
        assert_eq!(options[0].value, "65f0");
        assert_eq!(options[0].label, "Acme");
    }
}
