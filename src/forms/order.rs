use super::{EntityForm, FieldRule, FieldValue, FormField, Minimum, Rule};
use crate::http::RequestBody;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    OrderDate,
    ItemId,
    SupplierId,
    Qty,
}

impl FormField for OrderField {
    fn name(self) -> &'static str {
        match self {
            OrderField::OrderDate => "orderDate",
            OrderField::ItemId => "itemId",
            OrderField::SupplierId => "supplierId",
            OrderField::Qty => "qty",
        }
    }
}

/// "Add Order" form. The server prices the order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderForm {
    /// `YYYY-MM-DD`
    pub order_date: String,
    pub item_id: String,
    pub supplier_id: String,
    pub qty: String,
}

const QTY_MESSAGE: &str = "Quantity must be a positive number";

impl EntityForm for OrderForm {
    type Field = OrderField;

    const RULES: &'static [FieldRule<OrderField>] = &[
        FieldRule::new(OrderField::OrderDate, Rule::Required("Order date is required")),
        FieldRule::new(OrderField::ItemId, Rule::Required("Item is required")),
        FieldRule::new(OrderField::SupplierId, Rule::Required("Supplier is required")),
        FieldRule::new(
            OrderField::Qty,
            Rule::Number {
                required: Some(QTY_MESSAGE),
                invalid: QTY_MESSAGE,
                min: Minimum::Positive,
            },
        ),
    ];

    fn value(&self, field: OrderField) -> FieldValue<'_> {
        FieldValue::Text(match field {
            OrderField::OrderDate => &self.order_date,
            OrderField::ItemId => &self.item_id,
            OrderField::SupplierId => &self.supplier_id,
            OrderField::Qty => &self.qty,
        })
    }

    fn to_body(&self) -> RequestBody {
        RequestBody::Json(json!({
            "orderDate": self.order_date,
            "itemId": self.item_id,
            "supplierId": self.supplier_id,
            "qty": self.qty,
        }))
    }
}
