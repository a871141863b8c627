//! HTML fragments for the cart and checkout summary views.
//!
//! Every interpolated name or URL goes through [`escape_html`].

use std::fmt::Write;

use crate::cart::{Cart, CartItem};
use crate::money::{format_inr, format_unit_price};

pub const EMPTY_CART_HTML: &str = r#"<p class="empty-cart">Your cart is empty.</p>"#;

pub const EMPTY_SUMMARY_HTML: &str = r#"<p style="color:var(--muted);">No items in cart. Please add items from <a href="index.html">Home</a>.</p>"#;

pub const SUMMARY_ERROR_HTML: &str =
    r#"<p style="color:var(--error);">Error loading cart. Please try again.</p>"#;

/// Attribute carrying a cart line's position on its remove button.
pub const REMOVE_INDEX_ATTR: &str = "data-remove-index";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `Total: ₹x.xx`, or an empty string for an empty cart.
pub fn total_line(cart: &Cart) -> String {
    if cart.is_empty() {
        return String::new();
    }
    format!("Total: {}", format_inr(cart.total()))
}

fn image_tag(item: &CartItem, placeholder: &str) -> String {
    let placeholder = escape_html(placeholder);
    let src = item
        .primary_image()
        .map(escape_html)
        .unwrap_or_else(|| placeholder.clone());
    format!(
        r#"<img src="{src}" alt="{name} - Cart item" loading="lazy" width="100" height="100" onerror="this.src='{placeholder}';">"#,
        name = escape_html(&item.name),
    )
}

/// One block per line with its remove button keyed by position.
pub fn cart_items_html(cart: &Cart, placeholder: &str) -> String {
    let mut html = String::new();
    for (index, item) in cart.items().iter().enumerate() {
        let name = escape_html(&item.name);
        let _ = write!(
            html,
            r#"<div class="cart-item"><div class="cart-item-details">{img}<div><h3>{name}</h3><div class="price">{price} x {qty}</div><div class="qty">Subtotal: {subtotal}</div></div></div><button class="remove-btn" {REMOVE_INDEX_ATTR}="{index}" aria-label="Remove {name} from cart">Remove</button></div>"#,
            img = image_tag(item, placeholder),
            price = format_unit_price(item.price),
            qty = item.qty,
            subtotal = format_inr(item.subtotal()),
        );
    }
    html
}

/// Read-only list for the checkout page, followed by the total.
pub fn product_summary_html(cart: &Cart, placeholder: &str) -> String {
    let mut html = String::from(r#"<ul style="list-style:none;padding:0;">"#);
    for item in cart.items() {
        let _ = write!(
            html,
            r#"<li style="margin-bottom:8px; display:flex; align-items:center;">{img}<div><strong>{name}</strong> × {qty} - {subtotal}</div></li>"#,
            img = image_tag(item, placeholder),
            name = escape_html(&item.name),
            qty = item.qty,
            subtotal = format_inr(item.subtotal()),
        );
    }
    let _ = write!(
        html,
        r#"</ul><div class="priceDisplay">{}</div>"#,
        total_line(cart)
    );
    html
}
