//! Records returned by the list endpoints.
//!
//! References between entities (Item -> Supplier, Order -> Item/Supplier) are
//! joined by the server and arrive as [`EntityRef`] objects carrying display
//! names; nothing here resolves them client-side.

pub mod de;
pub mod item;
pub mod order;
pub mod supplier;

pub use item::*;
pub use order::*;
pub use supplier::*;

use serde::Deserialize;

/// List responses wrap their rows: `{ "data": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A pre-joined reference to another entity.
///
/// Accepts either the populated object (`{"_id": .., "supplierName": ..}` or
/// `{"_id": .., "itemName": ..}`) or a bare id string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RefRepr")]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefRepr {
    Id(String),
    Object {
        #[serde(rename = "_id", alias = "id", default)]
        id: String,
        #[serde(rename = "supplierName", default)]
        supplier_name: Option<String>,
        #[serde(rename = "itemName", default)]
        item_name: Option<String>,
    },
}

impl From<RefRepr> for EntityRef {
    fn from(repr: RefRepr) -> Self {
        match repr {
            RefRepr::Id(id) => Self {
                id,
                name: String::new(),
            },
            RefRepr::Object {
                id,
                supplier_name,
                item_name,
            } => Self {
                id,
                name: supplier_name.or(item_name).unwrap_or_default(),
            },
        }
    }
}

/// One entry of a dropdown: the id submitted, the name displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Records that can populate a dropdown in another entity's form.
pub trait Selectable {
    fn select_option(&self) -> SelectOption;
}

pub fn select_options<T: Selectable>(records: &[T]) -> Vec<SelectOption> {
    records.iter().map(Selectable::select_option).collect()
}
