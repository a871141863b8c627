use std::cell::RefCell;

use chrono::Datelike;
use khozza_common::clipboard::{Clipboard, ClipboardError};
use khozza_common::render::REMOVE_INDEX_ATTR;
use khozza_common::session::{drive_countdown, CountdownStep};
use khozza_common::{Shop, Target};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::clipboard::NavigatorClipboard;
use crate::dom::DomSurface;
use crate::storage::LocalStorage;
use crate::{carousel, logging, parse_remove_index, shop_config};

type PageShop = Shop<LocalStorage, DomSurface>;

thread_local! {
    static SHOP: RefCell<Option<PageShop>> = const { RefCell::new(None) };
}

/// Run `f` against the page's shop, creating it on first use. Returns `None`
/// when there is no document to attach to.
///
/// The borrow ends when `f` returns, so nothing here may await inside `f`.
fn with_shop<T>(f: impl FnOnce(&mut PageShop) -> T) -> Option<T> {
    SHOP.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let Some(surface) = DomSurface::new() else {
                tracing::error!("no document available");
                return None;
            };
            *slot = Some(Shop::new(LocalStorage, surface).with_config(shop_config()));
        }
        slot.as_mut().map(f)
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    logging::init();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(on_document_click);
    if let Err(e) =
        document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        tracing::error!(error = ?e, "failed to register click handler");
    }
    on_click.forget();

    if document.ready_state() == "loading" {
        let on_ready = Closure::<dyn FnMut()>::new(on_page_load);
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        {
            tracing::error!(error = ?e, "failed to register load handler");
        }
        on_ready.forget();
    } else {
        on_page_load();
    }
}

fn on_page_load() {
    let year = chrono::Local::now().year();
    if let Some(Some(config)) = with_shop(|shop| shop.on_page_load(year)) {
        carousel::start(Target::Carousel.selector(), &config);
    }
}

/// Remove buttons are rendered with their line index in an attribute and
/// handled here by delegation.
fn on_document_click(event: web_sys::Event) {
    let Some(el) = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    else {
        return;
    };
    let selector = format!("[{REMOVE_INDEX_ATTR}]");
    let Some(button) = el.closest(&selector).ok().flatten() else {
        return;
    };
    match button
        .get_attribute(REMOVE_INDEX_ATTR)
        .and_then(|raw| parse_remove_index(&raw))
    {
        Some(index) => remove_item(index),
        None => tracing::warn!("remove button without a usable index"),
    }
}

#[wasm_bindgen(js_name = toggleMenu)]
pub fn toggle_menu() {
    let _ = with_shop(|shop| shop.toggle_menu());
}

#[wasm_bindgen(js_name = addToCart)]
pub fn add_to_cart(name: &str, price: f64, images: JsValue) {
    let images: Vec<String> = if images.is_undefined() || images.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(images).unwrap_or_else(|e| {
            tracing::warn!(name, error = %e, "ignoring unreadable image list");
            Vec::new()
        })
    };
    let _ = with_shop(|shop| shop.add_to_cart(name, price, images));
}

/// Takes `i32` so the page can pass a plain JS number.
#[wasm_bindgen(js_name = removeItem)]
pub fn remove_item(index: i32) {
    let _ = with_shop(|shop| shop.remove_item(i64::from(index)));
}

#[wasm_bindgen(js_name = goToCheckout)]
pub fn go_to_checkout() {
    let _ = with_shop(|shop| shop.go_to_checkout());
}

#[wasm_bindgen(js_name = validateAndSave)]
pub fn validate_and_save(event: Option<web_sys::Event>) {
    if let Some(event) = event {
        event.prevent_default();
    }
    let started = with_shop(|shop| shop.validate_and_save()).is_some_and(|r| r.is_ok());
    if !started {
        return;
    }

    wasm_bindgen_futures::spawn_local(async {
        let tick = || with_shop(|shop| shop.tick_countdown()).unwrap_or(Ok(CountdownStep::Idle));
        let sleep = |interval: std::time::Duration| {
            gloo_timers::future::TimeoutFuture::new(interval.as_millis() as u32)
        };
        // Tick failures were already reported to the user.
        let _ = drive_countdown(tick, sleep).await;
    });
}

#[wasm_bindgen(js_name = confirmOrder)]
pub fn confirm_order() {
    let _ = with_shop(|shop| shop.confirm_order());
}

#[wasm_bindgen(js_name = copyOrderID)]
pub fn copy_order_id() {
    let Some(Ok(order_id)) = with_shop(|shop| shop.displayed_order_id()) else {
        return;
    };
    let Some(clipboard) = NavigatorClipboard::new() else {
        let _ = with_shop(|shop| shop.finish_copy(Err(ClipboardError::Unavailable)));
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        let result = clipboard.write_text(&order_id).await;
        let _ = with_shop(|shop| shop.finish_copy(result));
    });
}
