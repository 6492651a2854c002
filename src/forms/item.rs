use super::{EntityForm, FieldRule, FieldValue, FormField, Minimum, Rule};
use crate::http::{FilePart, MultipartForm, RequestBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    ItemName,
    InventoryLocation,
    Brand,
    Category,
    Stock,
    Price,
    DiscountPrice,
    SupplierId,
    Images,
}

impl FormField for ItemField {
    fn name(self) -> &'static str {
        match self {
            ItemField::ItemName => "itemName",
            ItemField::InventoryLocation => "inventoryLocation",
            ItemField::Brand => "brand",
            ItemField::Category => "category",
            ItemField::Stock => "stock",
            ItemField::Price => "price",
            ItemField::DiscountPrice => "discountPrice",
            ItemField::SupplierId => "supplierId",
            ItemField::Images => "imageUrl",
        }
    }
}

/// "Add Item" form. Sent as multipart, one `imageUrl` part per image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    pub item_name: String,
    pub inventory_location: String,
    pub brand: String,
    pub category: String,
    pub stock: String,
    pub price: String,
    /// Optional; sent as an empty field when blank.
    pub discount_price: String,
    pub supplier_id: String,
    pub images: Vec<FilePart>,
}

impl EntityForm for ItemForm {
    type Field = ItemField;

    const RULES: &'static [FieldRule<ItemField>] = &[
        FieldRule::new(ItemField::ItemName, Rule::Required("Item name is required")),
        FieldRule::new(
            ItemField::InventoryLocation,
            Rule::Required("Inventory location is required"),
        ),
        FieldRule::new(ItemField::Brand, Rule::Required("Brand is required")),
        FieldRule::new(ItemField::Category, Rule::Required("Category is required")),
        FieldRule::new(
            ItemField::Stock,
            Rule::Number {
                required: Some("Stock quantity is required"),
                invalid: "Stock must be a positive number",
                min: Minimum::Positive,
            },
        ),
        FieldRule::new(
            ItemField::Price,
            Rule::Number {
                required: Some("Price is required"),
                invalid: "Price must be a positive number",
                min: Minimum::Positive,
            },
        ),
        FieldRule::new(
            ItemField::DiscountPrice,
            Rule::Number {
                required: None,
                invalid: "Discount price must be a non-negative number",
                min: Minimum::NonNegative,
            },
        ),
        FieldRule::new(ItemField::SupplierId, Rule::Required("Supplier is required")),
        FieldRule::new(ItemField::Images, Rule::Files("At least one image is required")),
    ];

    fn value(&self, field: ItemField) -> FieldValue<'_> {
        let text = match field {
            ItemField::ItemName => &self.item_name,
            ItemField::InventoryLocation => &self.inventory_location,
            ItemField::Brand => &self.brand,
            ItemField::Category => &self.category,
            ItemField::Stock => &self.stock,
            ItemField::Price => &self.price,
            ItemField::DiscountPrice => &self.discount_price,
            ItemField::SupplierId => &self.supplier_id,
            ItemField::Images => return FieldValue::Files(&self.images),
        };
        FieldValue::Text(text)
    }

    fn to_body(&self) -> RequestBody {
        let mut form = MultipartForm::new()
            .text("itemName", &self.item_name)
            .text("inventoryLocation", &self.inventory_location)
            .text("brand", &self.brand)
            .text("category", &self.category)
            .text("stock", &self.stock)
            .text("price", &self.price)
            .text("discountPrice", &self.discount_price)
            .text("supplierId", &self.supplier_id);
        for image in &self.images {
            form = form.file(ItemField::Images.name(), image.clone());
        }
        RequestBody::Multipart(form)
    }
}
