use super::{EntityForm, FieldRule, FieldValue, FormField, Rule};
use crate::http::RequestBody;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierField {
    SupplierName,
    Address,
    Email,
    Phone,
    TaxNo,
    Country,
}

impl FormField for SupplierField {
    fn name(self) -> &'static str {
        match self {
            SupplierField::SupplierName => "supplierName",
            SupplierField::Address => "address",
            SupplierField::Email => "email",
            SupplierField::Phone => "phone",
            SupplierField::TaxNo => "taxNo",
            SupplierField::Country => "country",
        }
    }
}

/// "Add Supplier" form. Sent as JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierForm {
    pub supplier_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub tax_no: String,
    pub country: String,
}

impl EntityForm for SupplierForm {
    type Field = SupplierField;

    const RULES: &'static [FieldRule<SupplierField>] = &[
        FieldRule::new(
            SupplierField::SupplierName,
            Rule::Required("Supplier name is required"),
        ),
        FieldRule::new(SupplierField::Address, Rule::Required("Address is required")),
        FieldRule::new(
            SupplierField::Email,
            Rule::Email {
                required: "Email is required",
                invalid: "Email address is invalid",
            },
        ),
        FieldRule::new(
            SupplierField::Phone,
            Rule::Phone {
                required: "Phone number is required",
                invalid: "Phone number should be 10 digits",
            },
        ),
        FieldRule::new(SupplierField::TaxNo, Rule::Required("Tax number is required")),
        FieldRule::new(SupplierField::Country, Rule::Required("Country is required")),
    ];

    fn value(&self, field: SupplierField) -> FieldValue<'_> {
        FieldValue::Text(match field {
            SupplierField::SupplierName => &self.supplier_name,
            SupplierField::Address => &self.address,
            SupplierField::Email => &self.email,
            SupplierField::Phone => &self.phone,
            SupplierField::TaxNo => &self.tax_no,
            SupplierField::Country => &self.country,
        })
    }

    fn to_body(&self) -> RequestBody {
        RequestBody::Json(json!({
            "supplierName": self.supplier_name,
            "address": self.address,
            "email": self.email,
            "phone": self.phone,
            "taxNo": self.tax_no,
            "country": self.country,
        }))
    }
}
