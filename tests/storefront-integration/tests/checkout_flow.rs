use std::time::Duration;

use khozza_common::checkout::CheckoutForm;
use khozza_common::session::{drive_countdown, CheckoutState, CountdownStep, TICK_INTERVAL};
use khozza_common::store::{KeyValueStore, CART_KEY, ORDERS_KEY};
use khozza_common::surface::{DisplayMode, SurfaceError};
use khozza_common::{ShopConfig, ShopError, Target};
use khozza_storefront_integration::harness::ShopHarness;
use khozza_storefront_integration::{valid_form, DUPATTA, KURTA, VALID_UPI_REF};

#[test]
fn full_purchase() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA, KURTA, DUPATTA]);
    h.reload_checkout();

    assert_eq!(h.submit(&valid_form()).unwrap(), 5);
    assert_eq!(
        h.checkout.surface().display_of(Target::LoadingOverlay),
        Some(DisplayMode::Flex)
    );
    assert_eq!(h.wait_for_payment(), 5);
    assert_eq!(
        h.checkout.surface().text_of(Target::UpiAmount),
        "Amount: ₹2047.50"
    );

    let order_id = h.confirm(VALID_UPI_REF).unwrap();
    assert!(order_id.as_str().starts_with("KHOZZA-20261018-"));

    let page = h.checkout.surface();
    assert_eq!(page.display_of(Target::CheckoutCard), Some(DisplayMode::None));
    assert_eq!(page.display_of(Target::UpiSection), Some(DisplayMode::None));
    assert_eq!(page.display_of(Target::OrderConfirm), Some(DisplayMode::Block));
    assert_eq!(page.text_of(Target::OrderNum), order_id.as_str());
    assert_eq!(page.text_of(Target::OrderDetails), "Total Items: 2 — ₹2047.50");
    assert!(page.alerts.is_empty());

    assert!(h.stored_cart().is_empty());
    let orders = h.stored_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].shipping.name, "Asha Rao");
    assert_eq!(orders[0].shipping.phone, "+919876543210");
    assert_eq!(orders[0].total_amount, 2047.5);
}

/// The persisted order is a flat camelCase record, readable by anything that
/// consumed the old page script's history.
#[test]
fn persisted_order_shape() {
    let mut h = ShopHarness::setup();
    h.add_products(&[DUPATTA]);
    let order_id = h.checkout_cart(&valid_form());

    let raw = h.store.get_item(ORDERS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "name": "Asha Rao",
            "phone": "+919876543210",
            "pincode": "560001",
            "address": "12 MG Road, Bengaluru",
            "items": [{
                "name": "Chanderi Dupatta",
                "price": 449.5,
                "images": ["image/dupatta.jpg"],
                "qty": 1
            }],
            "totalAmount": 449.5,
            "orderId": order_id.as_str(),
            "status": "Confirmed",
            "upiRef": VALID_UPI_REF
        }])
    );
    assert_eq!(h.store.get_item(CART_KEY).unwrap(), None);
}

#[test]
fn order_history_accumulates() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    let first = h.checkout_cart(&valid_form());

    h.add_products(&[DUPATTA, DUPATTA]);
    let second = h.checkout_cart(&valid_form());

    let orders = h.stored_orders();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_id, first);
    assert_eq!(orders[1].order_id, second);
    assert_eq!(orders[0].items[0].name, "Block Print Kurta");
    assert_eq!(orders[1].items[0].qty, 2);
    assert_eq!(orders[1].total_amount, 899.0);
}

#[test]
fn invalid_form_keeps_checkout_card() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();

    let form = CheckoutForm {
        phone: "98 76".into(),
        ..valid_form()
    };
    let Err(ShopError::InvalidForm(errors)) = h.submit(&form) else {
        panic!("form with a spaced phone number was accepted");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(
        h.checkout.surface().text_of(Target::PhoneError),
        "Valid phone number is required (digits only)."
    );
    assert_eq!(h.checkout.surface().text_of(Target::NameError), "");
    assert_eq!(h.checkout.surface().display_of(Target::LoadingOverlay), None);
    assert_eq!(h.checkout.tick_countdown().unwrap(), CountdownStep::Idle);

    // Fixing the field lets the same page proceed.
    assert_eq!(h.submit(&valid_form()).unwrap(), 5);
    assert_eq!(h.checkout.surface().text_of(Target::PhoneError), "");
}

#[test]
fn script_tags_are_stripped_from_shipping_details() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    let form = CheckoutForm {
        name: "Asha<SCRIPT>".into(),
        address: "<script>12 MG Road".into(),
        ..valid_form()
    };
    h.checkout_cart(&form);

    let orders = h.stored_orders();
    let order = &orders[0];
    assert_eq!(order.shipping.name, "Asha");
    assert_eq!(order.shipping.address, "12 MG Road");
}

#[test]
fn cancelled_countdown_returns_to_form() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();
    h.submit(&valid_form()).unwrap();
    h.checkout.tick_countdown().unwrap();

    assert!(h.checkout.cancel_countdown().unwrap());
    assert_eq!(h.checkout.session().state(), &CheckoutState::Form);
    assert_eq!(
        h.checkout.surface().display_of(Target::LoadingOverlay),
        Some(DisplayMode::None)
    );

    h.submit(&valid_form()).unwrap();
    assert_eq!(h.wait_for_payment(), 5);
}

#[test]
fn custom_countdown_and_prefix() {
    let config = ShopConfig {
        order_id_prefix: "DEMO".into(),
        countdown_secs: 2,
        ..ShopConfig::default()
    };
    let mut h = ShopHarness::with_config(config);
    h.add_products(&[KURTA]);
    h.reload_checkout();

    assert_eq!(h.submit(&valid_form()).unwrap(), 2);
    assert_eq!(h.wait_for_payment(), 2);
    let order_id = h.confirm(VALID_UPI_REF).unwrap();
    assert!(order_id.as_str().starts_with("DEMO-20261018-"));
}

/// Amount shown for payment comes from the cart at submit time; the order
/// records the cart as it is when confirmed.
#[test]
fn cart_changed_in_another_tab_during_payment() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();
    h.submit(&valid_form()).unwrap();
    h.wait_for_payment();
    assert_eq!(
        h.checkout.surface().text_of(Target::UpiAmount),
        "Amount: ₹799.00"
    );

    h.add_products(&[DUPATTA]);
    h.confirm(VALID_UPI_REF).unwrap();
    let orders = h.stored_orders();
    let order = &orders[0];
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_amount, 1248.5);
}

#[test]
fn missing_overlay_is_reported_not_fatal() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();
    h.checkout.surface_mut().remove(Target::LoadingOverlay);

    let err = h.submit(&valid_form()).unwrap_err();
    assert!(matches!(
        err,
        ShopError::Surface(SurfaceError::MissingTarget(Target::LoadingOverlay))
    ));
    assert_eq!(
        h.checkout.surface().alerts,
        vec!["Error processing form. Please try again."]
    );
    assert_eq!(h.checkout.session().state(), &CheckoutState::Form);

    h.checkout.surface_mut().insert(Target::LoadingOverlay);
    assert_eq!(h.submit(&valid_form()).unwrap(), 5);
    assert_eq!(h.wait_for_payment(), 5);
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_on_a_one_second_timer() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();
    h.submit(&valid_form()).unwrap();

    let started = tokio::time::Instant::now();
    let mut seen = Vec::new();
    let checkout = &mut h.checkout;
    drive_countdown(
        || {
            let step = checkout.tick_countdown()?;
            seen.push(checkout.surface().text_of(Target::Countdown).to_string());
            Ok::<_, ShopError>(step)
        },
        tokio::time::sleep,
    )
    .await
    .unwrap();

    assert_eq!(seen, vec!["4", "3", "2", "1", "0"]);
    let elapsed = started.elapsed();
    assert!(elapsed >= TICK_INTERVAL * 5 && elapsed < Duration::from_secs(6));
    assert_eq!(
        h.checkout.surface().display_of(Target::UpiSection),
        Some(DisplayMode::Block)
    );
}
