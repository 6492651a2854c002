use inventory_console::forms::{
    EntityForm, FormError, FormField, FormPhase, ItemField, ItemForm, NotificationLevel,
    OrderField, OrderForm, SubmitOutcome, SupplierField, SupplierForm,
};
use inventory_console::framework::mock::MockTransport;
use inventory_console::http::{ApiError, FilePart, Method};
use inventory_console::lifecycle::InventorySystem;
use serde_json::json;
use std::sync::Arc;

fn supplier() -> SupplierForm {
    SupplierForm {
        supplier_name: "Acme".into(),
        address: "1 Main St".into(),
        email: "a@b.com".into(),
        phone: "1234567890".into(),
        tax_no: "T1".into(),
        country: "US".into(),
    }
}

fn item() -> ItemForm {
    ItemForm {
        item_name: "Widget".into(),
        inventory_location: "A1".into(),
        brand: "Acme".into(),
        category: "Tools".into(),
        stock: "5".into(),
        price: "9.5".into(),
        discount_price: "1".into(),
        supplier_id: "s1".into(),
        images: vec![FilePart::new("w.png", "image/png", vec![0])],
    }
}

fn order() -> OrderForm {
    OrderForm {
        order_date: "2024-03-01".into(),
        item_id: "i1".into(),
        supplier_id: "s1".into(),
        qty: "3".into(),
    }
}

#[test]
fn test_valid_forms_have_no_errors() {
    assert!(supplier().validate().is_empty());
    assert!(item().validate().is_empty());
    assert!(order().validate().is_empty());
}

/// Clearing any single required field reports exactly that field.
#[test]
fn test_each_required_field_is_reported() {
    let supplier_fields: [(SupplierField, fn(&mut SupplierForm)); 6] = [
        (SupplierField::SupplierName, |f| f.supplier_name.clear()),
        (SupplierField::Address, |f| f.address.clear()),
        (SupplierField::Email, |f| f.email.clear()),
        (SupplierField::Phone, |f| f.phone.clear()),
        (SupplierField::TaxNo, |f| f.tax_no.clear()),
        (SupplierField::Country, |f| f.country.clear()),
    ];
    for (field, clear) in supplier_fields {
        let mut form = supplier();
        clear(&mut form);
        let errors = form.validate();
        assert_eq!(errors.len(), 1, "{}", field.name());
        assert!(errors.contains(field.name()));
    }

    let item_fields: [(ItemField, fn(&mut ItemForm)); 8] = [
        (ItemField::ItemName, |f| f.item_name.clear()),
        (ItemField::InventoryLocation, |f| f.inventory_location.clear()),
        (ItemField::Brand, |f| f.brand.clear()),
        (ItemField::Category, |f| f.category.clear()),
        (ItemField::Stock, |f| f.stock.clear()),
        (ItemField::Price, |f| f.price.clear()),
        (ItemField::SupplierId, |f| f.supplier_id.clear()),
        (ItemField::Images, |f| f.images.clear()),
    ];
    for (field, clear) in item_fields {
        let mut form = item();
        clear(&mut form);
        let errors = form.validate();
        assert_eq!(errors.len(), 1, "{}", field.name());
        assert!(errors.contains(field.name()));
    }

    let order_fields: [(OrderField, fn(&mut OrderForm)); 4] = [
        (OrderField::OrderDate, |f| f.order_date.clear()),
        (OrderField::ItemId, |f| f.item_id.clear()),
        (OrderField::SupplierId, |f| f.supplier_id.clear()),
        (OrderField::Qty, |f| f.qty.clear()),
    ];
    for (field, clear) in order_fields {
        let mut form = order();
        clear(&mut form);
        let errors = form.validate();
        assert_eq!(errors.len(), 1, "{}", field.name());
        assert!(errors.contains(field.name()));
    }
}

#[test]
fn test_discount_price_is_optional() {
    let form = ItemForm {
        discount_price: String::new(),
        ..item()
    };
    assert!(form.validate().is_empty());
}

#[tokio::test]
async fn test_required_field_blocks_mutation() {
    let mock = Arc::new(MockTransport::new());
    let system = InventorySystem::new(mock.clone(), 16);

    let mut form = system.supplier_form();
    form.open();
    form.edit(|f| {
        *f = supplier();
        f.tax_no.clear();
    })
    .unwrap();

    let SubmitOutcome::Invalid(errors) = form.submit().await.unwrap() else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.get("taxNo"), Some("Tax number is required"));
    assert_eq!(form.phase(), FormPhase::Open);
    assert!(mock.requests().is_empty());

    drop(form);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_item_stock_must_be_positive() {
    let mock = Arc::new(MockTransport::new());
    mock.expect_post("/v1/item/add_item").return_ok(json!({}));
    let system = InventorySystem::new(mock.clone(), 16);

    let mut form = system.item_form();
    form.open();
    form.edit(|f| {
        *f = item();
        f.stock = "-5".into();
    })
    .unwrap();
    let SubmitOutcome::Invalid(errors) = form.submit().await.unwrap() else {
        panic!("expected validation errors");
    };
    assert!(errors.contains("stock"));

    form.edit(|f| f.stock = "5".into()).unwrap();
    assert!(!form.validate().contains("stock"));
    assert!(matches!(form.submit().await.unwrap(), SubmitOutcome::Created(_)));
    assert_eq!(mock.calls_to(Method::Post, "/v1/item/add_item"), 1);

    drop(form);
    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_order_qty_gate() {
    let mock = Arc::new(MockTransport::new());
    mock.expect_post("/v1/order/add_order").return_ok(json!({}));
    let system = InventorySystem::new(mock.clone(), 16);

    let mut form = system.order_form();
    form.open();
    form.edit(|f| {
        *f = order();
        f.qty = "0".into();
    })
    .unwrap();
    let SubmitOutcome::Invalid(errors) = form.submit().await.unwrap() else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.get("qty"), Some("Quantity must be a positive number"));
    assert!(mock.requests().is_empty());

    form.edit(|f| f.qty = "3".into()).unwrap();
    assert!(matches!(form.submit().await.unwrap(), SubmitOutcome::Created(_)));
    assert_eq!(mock.requests().len(), 1);

    drop(form);
    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_each_submit_is_its_own_request() {
    let mock = Arc::new(MockTransport::new());
    mock.expect_post("/v1/order/add_order").return_ok(json!({}));
    mock.expect_post("/v1/order/add_order").return_ok(json!({}));
    let system = InventorySystem::new(mock.clone(), 16);

    let mut form = system.order_form();
    for _ in 0..2 {
        form.open();
        form.edit(|f| *f = order()).unwrap();
        assert!(matches!(form.submit().await.unwrap(), SubmitOutcome::Created(_)));
    }
    assert_eq!(mock.calls_to(Method::Post, "/v1/order/add_order"), 2);

    drop(form);
    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_transport_failure_notifies_generic_message() {
    let mock = Arc::new(MockTransport::new());
    mock.expect_post("/v1/item/add_item")
        .return_err(ApiError::Transport("timed out".into()));
    let system = InventorySystem::new(mock.clone(), 16);
    let mut toasts = system.notifier.subscribe();

    let mut form = system.item_form();
    form.open();
    form.edit(|f| *f = item()).unwrap();
    let outcome = form.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Failed(ApiError::Transport(_))));
    assert_eq!(form.values(), &item());
    let toast = toasts.recv().await.unwrap();
    assert_eq!(toast.level, NotificationLevel::Error);
    assert_eq!(toast.message, "Unexpected error occurred. Please try again.");

    form.cancel();
    assert_eq!(form.submit().await, Err(FormError::NotOpen));

    drop(form);
    mock.verify();
    system.shutdown().await.unwrap();
}
