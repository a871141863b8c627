//! In-memory storage, page and clipboard backends.
//!
//! Used when running the storefront outside a browser and by the test suites.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use crate::clipboard::{Clipboard, ClipboardError};
use crate::store::{KeyValueStore, StoreError};
use crate::surface::{DisplayMode, Surface, SurfaceError, Target};

/// `localStorage` stand-in. Clones share the same entries, the way every
/// page of an origin sees the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    /// Maximum total bytes of keys and values, if limited.
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Recorded state of one page element.
#[derive(Debug, Clone, Default, PartialEq)]
struct Element {
    text: String,
    html: String,
    display: Option<DisplayMode>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    value: String,
}

/// A page made of the given targets, recording everything rendered into it.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: HashMap<Target, Element>,
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
    pub preloaded: Vec<String>,
}

const CHROME: [Target; 3] = [Target::Nav, Target::Hamburger, Target::Year];

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            elements: targets
                .into_iter()
                .map(|target| (target, Element::default()))
                .collect(),
            ..Self::default()
        }
    }

    /// Landing page: navigation chrome and the product carousel.
    pub fn home_page() -> Self {
        Self::with_targets(CHROME.into_iter().chain([Target::Carousel]))
    }

    /// Cart page: item list and running total.
    pub fn cart_page() -> Self {
        Self::with_targets(
            CHROME
                .into_iter()
                .chain([Target::CartItems, Target::TotalAmount]),
        )
    }

    /// Checkout page: summary, form, payment overlay, UPI section and the
    /// confirmation view.
    pub fn checkout_page() -> Self {
        Self::with_targets(CHROME.into_iter().chain([
            Target::ProductSummary,
            Target::SummaryRow,
            Target::Name,
            Target::Phone,
            Target::CountryCode,
            Target::Pincode,
            Target::Address,
            Target::NameError,
            Target::PhoneError,
            Target::PincodeError,
            Target::AddressError,
            Target::UpiRefError,
            Target::LoadingOverlay,
            Target::Countdown,
            Target::CheckoutCard,
            Target::UpiSection,
            Target::UpiAmount,
            Target::UpiRef,
            Target::OrderConfirm,
            Target::OrderNum,
            Target::OrderDetails,
        ]))
    }

    /// Add an empty element for `target`, replacing any existing one.
    pub fn insert(&mut self, target: Target) -> &mut Self {
        self.elements.insert(target, Element::default());
        self
    }

    pub fn remove(&mut self, target: Target) -> &mut Self {
        self.elements.remove(&target);
        self
    }

    /// Type into a form control, creating it if absent.
    pub fn set_value(&mut self, target: Target, value: &str) -> &mut Self {
        self.elements.entry(target).or_default().value = value.to_string();
        self
    }

    pub fn fill_checkout_form(
        &mut self,
        name: &str,
        country_code: &str,
        phone: &str,
        pincode: &str,
        address: &str,
    ) -> &mut Self {
        self.set_value(Target::Name, name)
            .set_value(Target::CountryCode, country_code)
            .set_value(Target::Phone, phone)
            .set_value(Target::Pincode, pincode)
            .set_value(Target::Address, address)
    }

    /// Text content, empty for absent elements.
    pub fn text_of(&self, target: Target) -> &str {
        self.elements
            .get(&target)
            .map(|el| el.text.as_str())
            .unwrap_or("")
    }

    /// Inner markup, empty for absent elements.
    pub fn html_of(&self, target: Target) -> &str {
        self.elements
            .get(&target)
            .map(|el| el.html.as_str())
            .unwrap_or("")
    }

    pub fn display_of(&self, target: Target) -> Option<DisplayMode> {
        self.elements.get(&target).and_then(|el| el.display)
    }

    pub fn attribute_of(&self, target: Target, name: &str) -> Option<&str> {
        self.elements
            .get(&target)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    fn element_mut(&mut self, target: Target) -> Result<&mut Element, SurfaceError> {
        self.elements
            .get_mut(&target)
            .ok_or(SurfaceError::MissingTarget(target))
    }

    fn element_ref(&self, target: Target) -> Result<&Element, SurfaceError> {
        self.elements
            .get(&target)
            .ok_or(SurfaceError::MissingTarget(target))
    }
}

impl Surface for MemorySurface {
    fn contains(&self, target: Target) -> bool {
        self.elements.contains_key(&target)
    }

    fn set_text(&mut self, target: Target, text: &str) -> Result<(), SurfaceError> {
        let el = self.element_mut(target)?;
        el.text = text.to_string();
        el.html.clear();
        Ok(())
    }

    fn set_html(&mut self, target: Target, html: &str) -> Result<(), SurfaceError> {
        let el = self.element_mut(target)?;
        el.html = html.to_string();
        el.text.clear();
        Ok(())
    }

    fn set_display(&mut self, target: Target, mode: DisplayMode) -> Result<(), SurfaceError> {
        self.element_mut(target)?.display = Some(mode);
        Ok(())
    }

    fn set_attribute(
        &mut self,
        target: Target,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), SurfaceError> {
        let attributes = &mut self.element_mut(target)?.attributes;
        match value {
            Some(value) => {
                attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                attributes.remove(name);
            }
        }
        Ok(())
    }

    fn toggle_class(&mut self, target: Target, class: &str) -> Result<bool, SurfaceError> {
        let classes = &mut self.element_mut(target)?.classes;
        if classes.remove(class) {
            Ok(false)
        } else {
            classes.insert(class.to_string());
            Ok(true)
        }
    }

    fn value(&self, target: Target) -> Result<String, SurfaceError> {
        Ok(self.element_ref(target)?.value.clone())
    }

    fn text(&self, target: Target) -> Result<String, SurfaceError> {
        Ok(self.element_ref(target)?.text.clone())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }

    fn preload_images(&mut self, urls: &[String]) {
        self.preloaded.extend_from_slice(urls);
    }
}

/// Clipboard that records copied text, or refuses every write when
/// constructed with [`MemoryClipboard::unavailable`].
#[derive(Debug)]
pub struct MemoryClipboard {
    contents: RefCell<Option<String>>,
    available: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            contents: RefCell::new(None),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            contents: RefCell::new(None),
            available: false,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if !self.available {
            return Err(ClipboardError::Unavailable);
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
