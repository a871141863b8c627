use khozza_common::clipboard::{Clipboard, ClipboardError};
use wasm_bindgen_futures::JsFuture;

/// `navigator.clipboard`, when the browser exposes it.
pub struct NavigatorClipboard {
    clipboard: web_sys::Clipboard,
}

impl NavigatorClipboard {
    pub fn new() -> Option<Self> {
        let navigator = web_sys::window()?.navigator();
        // Insecure contexts have no clipboard; the binding still returns an
        // object, so check the property directly.
        let present = js_sys::Reflect::has(&navigator, &"clipboard".into()).unwrap_or(false);
        present.then(|| Self {
            clipboard: navigator.clipboard(),
        })
    }
}

impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        JsFuture::from(self.clipboard.write_text(text))
            .await
            .map(|_| ())
            .map_err(|e| ClipboardError::Rejected(e.as_string().unwrap_or_else(|| format!("{e:?}"))))
    }
}
