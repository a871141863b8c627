//! Browser front end for the Khozza storefront.
//!
//! Exposes the page handlers the static HTML calls (`addToCart`,
//! `validateAndSave`, ...) and wires the shared [`Shop`](khozza_common::Shop)
//! to `localStorage`, the live document and the clipboard.

use khozza_common::ShopConfig;

#[cfg(target_family = "wasm")]
mod carousel;
#[cfg(target_family = "wasm")]
mod clipboard;
#[cfg(target_family = "wasm")]
mod dom;
#[cfg(target_family = "wasm")]
mod handlers;
#[cfg(target_family = "wasm")]
mod logging;
#[cfg(target_family = "wasm")]
mod storage;

/// Shop settings, with build-time overrides from `KHOZZA_ORDER_PREFIX`,
/// `KHOZZA_COUNTDOWN_SECS` and `KHOZZA_CHECKOUT_PAGE`.
pub fn shop_config() -> ShopConfig {
    apply_overrides(
        ShopConfig::default(),
        option_env!("KHOZZA_ORDER_PREFIX"),
        option_env!("KHOZZA_COUNTDOWN_SECS"),
        option_env!("KHOZZA_CHECKOUT_PAGE"),
    )
}

fn apply_overrides(
    mut config: ShopConfig,
    prefix: Option<&str>,
    countdown_secs: Option<&str>,
    checkout_page: Option<&str>,
) -> ShopConfig {
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        config.order_id_prefix = prefix.to_string();
    }
    if let Some(secs) = countdown_secs.and_then(|s| s.parse().ok()) {
        config.countdown_secs = secs;
    }
    if let Some(page) = checkout_page.filter(|p| !p.is_empty()) {
        config.checkout_page = page.to_string();
    }
    config
}

/// Line index carried by a remove button. JS numbers cross the wasm boundary
/// as `i32`; anything that does not fit is not a line index.
pub fn parse_remove_index(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}
