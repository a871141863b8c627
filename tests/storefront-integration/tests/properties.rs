//! Behavioural guarantees of the storefront, checked through the page
//! handlers against shared in-memory storage.

use khozza_common::checkout::{CheckoutForm, Field};
use khozza_common::money::format_inr;
use khozza_common::render::total_line;
use khozza_common::session::CheckoutState;
use khozza_common::{Cart, ShopError, Target};
use khozza_storefront_integration::harness::ShopHarness;
use khozza_storefront_integration::{valid_form, DUPATTA, JHUMKA, KURTA, VALID_UPI_REF};
use regex::Regex;

#[test]
fn adding_same_name_merges_lines() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA, KURTA]);

    let cart = h.stored_cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].qty, 2);
}

#[test]
fn subtotals_have_two_decimals() {
    let mut h = ShopHarness::setup();
    for _ in 0..3 {
        h.add_products(&[JHUMKA]);
    }
    h.add_products(&[DUPATTA]);
    h.reload_cart();

    let html = h.cart.surface().html_of(Target::CartItems);
    // 129.99 × 3 and 449.5 × 1
    assert!(html.contains("Subtotal: ₹389.97"));
    assert!(html.contains("Subtotal: ₹449.50"));
    for item in h.stored_cart().items() {
        let shown = format_inr(item.subtotal());
        let decimals = shown.rsplit('.').next().unwrap();
        assert_eq!(decimals.len(), 2, "{shown}");
    }
}

#[test]
fn total_is_sum_of_subtotals() {
    let mut h = ShopHarness::setup();
    h.reload_cart();
    assert_eq!(h.cart.surface().text_of(Target::TotalAmount), "");
    assert_eq!(total_line(&Cart::new()), "");

    h.add_products(&[KURTA, DUPATTA, JHUMKA, JHUMKA]);
    h.reload_cart();
    // 799 + 449.5 + 259.98
    assert_eq!(
        h.cart.surface().text_of(Target::TotalAmount),
        "Total: ₹1508.48"
    );
}

#[test]
fn out_of_range_remove_is_a_no_op() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA, DUPATTA]);
    h.reload_cart();
    let before = h.stored_cart();

    for index in [-5, -1, 2, 100, i64::MAX] {
        assert!(!h.cart.remove_item(index).unwrap());
        assert_eq!(h.stored_cart(), before);
    }
    assert!(h.cart.surface().alerts.is_empty());
}

#[test]
fn four_invalid_fields_give_four_errors() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();

    let form = CheckoutForm {
        name: "   ".into(),
        phone: "phone".into(),
        country_code: "+91".into(),
        pincode: "12".into(),
        address: String::new(),
    };
    let Err(ShopError::InvalidForm(errors)) = h.submit(&form) else {
        panic!("invalid form was accepted");
    };
    assert_eq!(errors.len(), 4);
    for field in Field::ALL {
        assert!(!h.checkout.surface().text_of(field.error_target()).is_empty());
    }
    assert_eq!(h.checkout.session().state(), &CheckoutState::Form);
}

#[test]
fn phone_must_be_digits() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();

    let letters = CheckoutForm {
        phone: "abc123".into(),
        ..valid_form()
    };
    assert!(h.submit(&letters).is_err());
    assert_eq!(
        h.checkout.surface().text_of(Target::PhoneError),
        "Valid phone number is required (digits only)."
    );

    let digits = CheckoutForm {
        phone: "9876543210".into(),
        pincode: "560001".into(),
        ..valid_form()
    };
    assert!(h.submit(&digits).is_ok());
    assert_eq!(h.checkout.surface().text_of(Target::PhoneError), "");
}

#[test]
fn order_id_carries_todays_date() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();
    h.submit(&valid_form()).unwrap();
    h.wait_for_payment();
    h.checkout
        .surface_mut()
        .set_value(Target::UpiRef, VALID_UPI_REF);

    let stamp = || chrono::Local::now().date_naive().format("%Y%m%d").to_string();
    let before = stamp();
    let order_id = h.checkout.confirm_order().unwrap();
    let after = stamp();

    let pattern = Regex::new(r"^KHOZZA-([0-9]{8})-([0-9]{4})$").unwrap();
    let caps = pattern.captures(order_id.as_str()).unwrap();
    // Either side of midnight is acceptable.
    assert!(caps[1] == before || caps[1] == after, "{order_id}");
    let suffix: u16 = caps[2].parse().unwrap();
    assert!((1000..=9999).contains(&suffix));
}

#[test]
fn checkout_navigation_follows_cart_contents() {
    let mut h = ShopHarness::setup();
    assert!(!h.cart.go_to_checkout().unwrap());
    assert!(h.cart.surface().navigations.is_empty());

    h.add_products(&[JHUMKA]);
    assert!(h.cart.go_to_checkout().unwrap());
    assert_eq!(h.cart.surface().navigations.len(), 1);

    h.cart.remove_item(0).unwrap();
    assert!(!h.cart.go_to_checkout().unwrap());
    assert_eq!(h.cart.surface().navigations.len(), 1);
}

#[test]
fn confirmation_moves_cart_into_history() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.checkout_cart(&valid_form());
    let history_before = h.stored_orders().len();

    h.add_products(&[DUPATTA, JHUMKA, DUPATTA]);
    let snapshot = h.stored_cart();
    h.checkout_cart(&valid_form());

    assert!(h.stored_cart().is_empty());
    let orders = h.stored_orders();
    assert_eq!(orders.len(), history_before + 1);
    assert_eq!(orders.last().unwrap().items, snapshot.into_items());
}

#[test]
fn malformed_reference_blocks_confirmation() {
    let mut h = ShopHarness::setup();
    h.add_products(&[KURTA]);
    h.reload_checkout();
    h.submit(&valid_form()).unwrap();
    h.wait_for_payment();

    for bad in ["123", "12345678901a", "1234567890123", "1234 5678 9012"] {
        assert!(matches!(h.confirm(bad), Err(ShopError::InvalidUpiRef)));
        assert!(h.stored_orders().is_empty());
        assert_eq!(h.stored_cart().len(), 1);
        assert_eq!(
            h.checkout.surface().text_of(Target::UpiRefError),
            "Please enter a valid 12-digit UPI reference number."
        );
    }

    h.confirm(VALID_UPI_REF).unwrap();
    assert_eq!(h.stored_orders().len(), 1);
    assert_eq!(h.checkout.surface().text_of(Target::UpiRefError), "");
}
