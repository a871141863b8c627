use khozza_common::surface::{DisplayMode, Surface, SurfaceError, Target};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Window,
};

/// The live document. Elements are looked up on every access, so a handler
/// always sees the page as it currently is.
pub struct DomSurface {
    window: Window,
    document: Document,
}

impl DomSurface {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn find(&self, target: Target) -> Option<Element> {
        self.document.query_selector(target.selector()).ok().flatten()
    }

    fn element(&self, target: Target) -> Result<Element, SurfaceError> {
        self.find(target).ok_or(SurfaceError::MissingTarget(target))
    }
}

fn rejected(target: Target, err: JsValue) -> SurfaceError {
    SurfaceError::Rejected {
        target,
        reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

impl Surface for DomSurface {
    fn contains(&self, target: Target) -> bool {
        self.find(target).is_some()
    }

    fn set_text(&mut self, target: Target, text: &str) -> Result<(), SurfaceError> {
        self.element(target)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_html(&mut self, target: Target, html: &str) -> Result<(), SurfaceError> {
        self.element(target)?.set_inner_html(html);
        Ok(())
    }

    fn set_display(&mut self, target: Target, mode: DisplayMode) -> Result<(), SurfaceError> {
        let el = self
            .element(target)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SurfaceError::Rejected {
                target,
                reason: "not an HTML element".into(),
            })?;
        el.style()
            .set_property("display", mode.as_css())
            .map_err(|e| rejected(target, e))
    }

    fn set_attribute(
        &mut self,
        target: Target,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), SurfaceError> {
        let el = self.element(target)?;
        match value {
            Some(value) => el.set_attribute(name, value),
            None => el.remove_attribute(name),
        }
        .map_err(|e| rejected(target, e))
    }

    fn toggle_class(&mut self, target: Target, class: &str) -> Result<bool, SurfaceError> {
        self.element(target)?
            .class_list()
            .toggle(class)
            .map_err(|e| rejected(target, e))
    }

    fn value(&self, target: Target) -> Result<String, SurfaceError> {
        let el = self.element(target)?;
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            Ok(input.value())
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            Ok(select.value())
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            Ok(area.value())
        } else {
            Err(SurfaceError::Rejected {
                target,
                reason: "not a form control".into(),
            })
        }
    }

    fn text(&self, target: Target) -> Result<String, SurfaceError> {
        Ok(self.element(target)?.text_content().unwrap_or_default())
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::warn!(error = ?e, "alert was blocked");
        }
    }

    fn navigate(&mut self, href: &str) {
        if let Err(e) = self.window.location().set_href(href) {
            tracing::error!(href, error = ?e, "navigation failed");
        }
    }

    fn preload_images(&mut self, urls: &[String]) {
        for url in urls {
            match HtmlImageElement::new() {
                Ok(img) => img.set_src(url),
                Err(e) => tracing::debug!(url, error = ?e, "image preload skipped"),
            }
        }
    }
}
