use khozza_common::carousel::CarouselConfig;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// The page-global Swiper constructor.
    type Swiper;

    #[wasm_bindgen(constructor, catch)]
    fn new(selector: &str, options: &JsValue) -> Result<Swiper, JsValue>;
}

/// Start the home page carousel. Pages that did not load Swiper are skipped.
pub fn start(selector: &str, config: &CarouselConfig) {
    let has_swiper = js_sys::Reflect::has(&js_sys::global(), &"Swiper".into()).unwrap_or(false);
    if !has_swiper {
        tracing::debug!("Swiper not loaded, carousel skipped");
        return;
    }

    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let options = match config.serialize(&serializer) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode carousel options");
            return;
        }
    };
    if let Err(e) = Swiper::new(selector, &options) {
        tracing::error!(error = ?e, "carousel failed to start");
    }
}
