//! The cart and checkout manager behind every page handler.
//!
//! Each public operation is one user action. Failures are logged and paired
//! with a notice on the page; validation failures are shown inline on their
//! fields instead.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::carousel::CarouselConfig;
use crate::cart::CartError;
use crate::checkout::{CheckoutForm, Field, FieldError};
use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::ShopConfig;
use crate::money::format_inr;
use crate::order::{OrderId, UpiRef};
use crate::render;
use crate::session::{CheckoutError, CheckoutSession, CountdownStep};
use crate::store::{KeyValueStore, ShopStore, StoreError};
use crate::surface::{DisplayMode, Surface, SurfaceError, Target};

const ARIA_INVALID: &str = "aria-invalid";
const ARIA_EXPANDED: &str = "aria-expanded";
const MENU_OPEN_CLASS: &str = "show";

const UPI_REF_MESSAGE: &str = "Please enter a valid 12-digit UPI reference number.";
const EMPTY_CART_NOTICE: &str = "Your cart is empty. Please add items before proceeding.";
const CART_NOT_CLEARED_NOTICE: &str =
    "Your order is confirmed, but the cart could not be emptied. Please remove the items manually.";

#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("{} checkout field(s) invalid", .0.len())]
    InvalidForm(Vec<FieldError>),
    #[error("invalid UPI reference")]
    InvalidUpiRef,
    #[error("no order ID is displayed")]
    NothingToCopy,
}

impl ShopError {
    /// Validation failures are already shown next to their fields.
    pub fn is_inline(&self) -> bool {
        matches!(self, ShopError::InvalidForm(_) | ShopError::InvalidUpiRef)
    }

    fn notice(&self) -> Option<&'static str> {
        match self {
            ShopError::Checkout(CheckoutError::EmptyCart) => Some(EMPTY_CART_NOTICE),
            _ => None,
        }
    }
}

pub struct Shop<S, U> {
    store: ShopStore<S>,
    surface: U,
    session: CheckoutSession,
    config: ShopConfig,
    rng: StdRng,
}

impl<S: KeyValueStore, U: Surface> Shop<S, U> {
    pub fn new(backend: S, surface: U) -> Self {
        Self {
            store: ShopStore::new(backend),
            surface,
            session: CheckoutSession::new(),
            config: ShopConfig::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_config(mut self, config: ShopConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a fixed RNG for order ID suffixes.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn store(&self) -> &ShopStore<S> {
        &self.store
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Log a failed action and tell the user, unless the failure is already
    /// shown inline.
    fn report<T>(
        &mut self,
        action: &str,
        notice: &str,
        result: Result<T, ShopError>,
    ) -> Result<T, ShopError> {
        if let Err(err) = &result {
            if err.is_inline() {
                tracing::debug!(action, error = %err, "rejected input");
            } else {
                tracing::error!(action, error = %err, "storefront action failed");
                self.surface.alert(err.notice().unwrap_or(notice));
            }
        }
        result
    }

    // ─── Cart ────────────────────────────────────────────────────────────────

    /// Add one unit of a product. Returns the line's new quantity.
    pub fn add_to_cart(
        &mut self,
        name: &str,
        price: f64,
        images: Vec<String>,
    ) -> Result<u32, ShopError> {
        let result = self.try_add_to_cart(name, price, images);
        if result.is_ok() {
            self.surface.alert(&format!("{name} added to cart!"));
        }
        self.report(
            "add to cart",
            "Error adding item to cart. Please try again.",
            result,
        )
    }

    fn try_add_to_cart(
        &mut self,
        name: &str,
        price: f64,
        images: Vec<String>,
    ) -> Result<u32, ShopError> {
        let mut cart = self.store.cart()?;
        let qty = cart.add(name, price, images)?;
        self.store.save_cart(&cart)?;
        tracing::debug!(name, qty, "cart updated");
        Ok(qty)
    }

    /// Render the cart page. A page without a cart list is left alone.
    pub fn load_cart(&mut self) -> Result<(), ShopError> {
        if !self.surface.contains(Target::CartItems) {
            return Ok(());
        }
        let result = self.try_load_cart();
        self.report("load cart", "Error loading cart. Please try again.", result)
    }

    fn try_load_cart(&mut self) -> Result<(), ShopError> {
        let cart = self.store.cart()?;
        if cart.is_empty() {
            self.surface.set_html(Target::CartItems, render::EMPTY_CART_HTML)?;
            self.surface.set_text(Target::TotalAmount, "")?;
            return Ok(());
        }

        self.surface.preload_images(&cart.primary_images());
        let html = render::cart_items_html(&cart, &self.config.placeholder_image);
        self.surface.set_html(Target::CartItems, &html)?;
        self.surface
            .set_text(Target::TotalAmount, &render::total_line(&cart))?;
        Ok(())
    }

    /// Remove the line at `index` and re-render. Out-of-range indices do
    /// nothing. Returns whether a line was removed.
    pub fn remove_item(&mut self, index: i64) -> Result<bool, ShopError> {
        let result = self.try_remove_item(index);
        self.report(
            "remove item",
            "Error removing item. Please try again.",
            result,
        )
    }

    fn try_remove_item(&mut self, index: i64) -> Result<bool, ShopError> {
        let mut cart = self.store.cart()?;
        let Some(removed) = usize::try_from(index).ok().and_then(|i| cart.remove(i)) else {
            tracing::debug!(index, len = cart.len(), "remove index out of range");
            return Ok(false);
        };
        self.store.save_cart(&cart)?;
        tracing::debug!(name = %removed.name, "removed from cart");
        self.try_load_cart_if_shown()?;
        Ok(true)
    }

    fn try_load_cart_if_shown(&mut self) -> Result<(), ShopError> {
        if self.surface.contains(Target::CartItems) {
            self.try_load_cart()?;
        }
        Ok(())
    }

    /// Go to the checkout page if there is anything to buy. Returns whether
    /// navigation happened.
    pub fn go_to_checkout(&mut self) -> Result<bool, ShopError> {
        let result = self.store.cart().map_err(ShopError::from);
        let cart = self.report(
            "proceed to checkout",
            "Error proceeding to checkout. Please try again.",
            result,
        )?;
        if cart.is_empty() {
            self.surface.alert(EMPTY_CART_NOTICE);
            return Ok(false);
        }
        let page = self.config.checkout_page.clone();
        self.surface.navigate(&page);
        Ok(true)
    }

    /// Render the read-only summary on the checkout page.
    pub fn load_product_summary(&mut self) -> Result<(), ShopError> {
        if !self.surface.contains(Target::ProductSummary) {
            return Ok(());
        }
        let result = self.try_load_product_summary();
        if let Err(err) = &result {
            tracing::error!(error = %err, "failed to load product summary");
            if let Err(render_err) = self
                .surface
                .set_html(Target::ProductSummary, render::SUMMARY_ERROR_HTML)
            {
                tracing::error!(error = %render_err, "failed to show summary error");
            }
        }
        result
    }

    fn try_load_product_summary(&mut self) -> Result<(), ShopError> {
        let cart = self.store.cart()?;
        if cart.is_empty() {
            self.surface
                .set_html(Target::ProductSummary, render::EMPTY_SUMMARY_HTML)?;
            self.surface
                .set_display(Target::SummaryRow, DisplayMode::None)?;
            return Ok(());
        }

        self.surface.preload_images(&cart.primary_images());
        let html = render::product_summary_html(&cart, &self.config.placeholder_image);
        self.surface.set_html(Target::ProductSummary, &html)?;
        Ok(())
    }

    // ─── Checkout ────────────────────────────────────────────────────────────

    /// Validate the checkout form and, if it passes, start the simulated
    /// payment countdown. The caller drives [`tick_countdown`](Self::tick_countdown)
    /// once per [`TICK_INTERVAL`](crate::session::TICK_INTERVAL).
    pub fn validate_and_save(&mut self) -> Result<u8, ShopError> {
        let result = self.try_validate_and_save();
        self.report(
            "submit checkout form",
            "Error processing form. Please try again.",
            result,
        )
    }

    fn try_validate_and_save(&mut self) -> Result<u8, ShopError> {
        let form = self.read_form()?;
        self.clear_field_errors()?;

        let details = match form.validate() {
            Ok(details) => details,
            Err(errors) => {
                for error in &errors {
                    self.surface
                        .set_text(error.field.error_target(), error.message)?;
                    self.surface
                        .set_attribute(error.field.input(), ARIA_INVALID, Some("true"))?;
                }
                return Err(ShopError::InvalidForm(errors));
            }
        };

        let amount = self.store.cart()?.total();
        let start = self
            .session
            .begin_payment(details, amount, self.config.countdown_secs)?;
        if let Err(err) = self.show_countdown(start) {
            // No timer will be started, so the form must stay submittable.
            self.session.cancel();
            return Err(err);
        }
        Ok(start)
    }

    fn show_countdown(&mut self, start: u8) -> Result<(), ShopError> {
        self.surface
            .set_display(Target::LoadingOverlay, DisplayMode::Flex)?;
        self.surface.set_text(Target::Countdown, &start.to_string())?;
        Ok(())
    }

    fn read_form(&self) -> Result<CheckoutForm, ShopError> {
        Ok(CheckoutForm {
            name: self.surface.value(Target::Name)?,
            phone: self.surface.value(Target::Phone)?,
            // Optional selector; a page without one contributes no prefix.
            country_code: self.surface.value(Target::CountryCode).unwrap_or_default(),
            pincode: self.surface.value(Target::Pincode)?,
            address: self.surface.value(Target::Address)?,
        })
    }

    fn clear_field_errors(&mut self) -> Result<(), ShopError> {
        for field in Field::ALL {
            self.surface.set_text(field.error_target(), "")?;
            self.surface.set_attribute(field.input(), ARIA_INVALID, None)?;
        }
        self.surface.set_text(Target::UpiRefError, "")?;
        Ok(())
    }

    /// Advance the payment countdown by one second. When it reaches zero the
    /// checkout card is swapped for the UPI payment section.
    pub fn tick_countdown(&mut self) -> Result<CountdownStep, ShopError> {
        let result = self.try_tick_countdown();
        self.report(
            "payment countdown",
            "Error processing form. Please try again.",
            result,
        )
    }

    fn try_tick_countdown(&mut self) -> Result<CountdownStep, ShopError> {
        let step = self.session.tick();
        match step {
            CountdownStep::Remaining(left) => {
                self.surface.set_text(Target::Countdown, &left.to_string())?;
            }
            CountdownStep::Elapsed => {
                let amount = self.session.amount_due().unwrap_or_default();
                self.surface.set_text(Target::Countdown, "0")?;
                self.surface
                    .set_display(Target::LoadingOverlay, DisplayMode::None)?;
                self.surface
                    .set_display(Target::CheckoutCard, DisplayMode::None)?;
                self.surface
                    .set_display(Target::UpiSection, DisplayMode::Block)?;
                self.surface
                    .set_text(Target::UpiAmount, &format!("Amount: {}", format_inr(amount)))?;
            }
            CountdownStep::Idle => {}
        }
        Ok(step)
    }

    /// Abort a running payment countdown and hide the overlay. Returns
    /// whether a countdown was running.
    pub fn cancel_countdown(&mut self) -> Result<bool, ShopError> {
        if !self.session.cancel() {
            return Ok(false);
        }
        let result = self
            .surface
            .set_display(Target::LoadingOverlay, DisplayMode::None)
            .map(|()| true)
            .map_err(ShopError::from);
        self.report("cancel payment", "Error processing form. Please try again.", result)
    }

    /// Confirm payment with the UPI reference typed by the user, record the
    /// order and empty the cart.
    #[cfg(feature = "std")]
    pub fn confirm_order(&mut self) -> Result<OrderId, ShopError> {
        self.confirm_order_on(chrono::Local::now().date_naive())
    }

    /// [`confirm_order`](Self::confirm_order) with an explicit order date.
    pub fn confirm_order_on(&mut self, today: NaiveDate) -> Result<OrderId, ShopError> {
        let result = self.try_confirm_order(today);
        self.report(
            "confirm order",
            "Error confirming order. Please try again.",
            result,
        )
    }

    fn try_confirm_order(&mut self, today: NaiveDate) -> Result<OrderId, ShopError> {
        let raw = self.surface.value(Target::UpiRef)?;
        self.surface.set_text(Target::UpiRefError, "")?;
        self.surface.set_attribute(Target::UpiRef, ARIA_INVALID, None)?;

        let Ok(upi_ref) = UpiRef::parse(raw.trim()) else {
            self.surface.set_text(Target::UpiRefError, UPI_REF_MESSAGE)?;
            self.surface
                .set_attribute(Target::UpiRef, ARIA_INVALID, Some("true"))?;
            return Err(ShopError::InvalidUpiRef);
        };

        let items = self.store.cart()?.into_items();
        let order_id = OrderId::generate(&self.config.order_id_prefix, today, &mut self.rng);
        let order = self.session.build_order(upi_ref, items, order_id.clone())?;
        let summary = order.summary_line();

        let count = self.store.append_order(&order)?;
        // Once recorded, the staged details are spent whatever happens next.
        self.session.complete(order)?;
        tracing::info!(order_id = %order_id, orders = count, "order recorded");

        if let Err(err) = self.store.clear_cart() {
            tracing::error!(order_id = %order_id, error = %err, "failed to clear cart after order");
            self.surface.alert(CART_NOT_CLEARED_NOTICE);
        }

        self.surface
            .set_display(Target::UpiSection, DisplayMode::None)?;
        self.surface
            .set_display(Target::OrderConfirm, DisplayMode::Block)?;
        self.surface.set_text(Target::OrderNum, order_id.as_str())?;
        self.surface.set_text(Target::OrderDetails, &summary)?;
        Ok(order_id)
    }

    /// The order ID currently shown on the confirmation view.
    pub fn displayed_order_id(&mut self) -> Result<String, ShopError> {
        let result = self
            .surface
            .text(Target::OrderNum)
            .map_err(ShopError::from)
            .and_then(|id| {
                let id = id.trim().to_string();
                if id.is_empty() {
                    Err(ShopError::NothingToCopy)
                } else {
                    Ok(id)
                }
            });
        self.report(
            "copy order ID",
            "Failed to copy Order ID. Please copy manually.",
            result,
        )
    }

    /// Tell the user how a clipboard write went.
    pub fn finish_copy(&mut self, result: Result<(), ClipboardError>) -> Result<(), ShopError> {
        if result.is_ok() {
            self.surface.alert("Order ID copied to clipboard");
        }
        self.report(
            "copy order ID",
            "Failed to copy Order ID. Please copy manually.",
            result.map_err(ShopError::from),
        )
    }

    /// Copy the displayed order ID to `clipboard`.
    ///
    /// The browser front end holds the shop in a `RefCell` and cannot keep it
    /// borrowed across the await, so it calls
    /// [`displayed_order_id`](Self::displayed_order_id) and
    /// [`finish_copy`](Self::finish_copy) itself.
    pub async fn copy_order_id<C: Clipboard>(&mut self, clipboard: &C) -> Result<(), ShopError> {
        let order_id = self.displayed_order_id()?;
        let result = clipboard.write_text(&order_id).await;
        self.finish_copy(result)
    }

    // ─── Page chrome ─────────────────────────────────────────────────────────

    /// Open or close the navigation menu. Returns whether it is now open.
    pub fn toggle_menu(&mut self) -> Result<bool, ShopError> {
        let result = self.try_toggle_menu();
        if let Err(err) = &result {
            tracing::error!(error = %err, "failed to toggle menu");
        }
        result
    }

    fn try_toggle_menu(&mut self) -> Result<bool, ShopError> {
        let open = self.surface.toggle_class(Target::Nav, MENU_OPEN_CLASS)?;
        let expanded = if open { "true" } else { "false" };
        self.surface
            .set_attribute(Target::Hamburger, ARIA_EXPANDED, Some(expanded))?;
        Ok(open)
    }

    /// Initial render for whichever page is loaded. Returns the carousel
    /// options when the page has a carousel to start.
    pub fn on_page_load(&mut self, year: i32) -> Option<CarouselConfig> {
        let carousel = self
            .surface
            .contains(Target::Carousel)
            .then(CarouselConfig::default);
        // Both loaders report their own failures.
        let _ = self.load_cart();
        let _ = self.load_product_summary();
        if let Err(err) = self.surface.set_text(Target::Year, &year.to_string()) {
            tracing::error!(error = %err, "failed to stamp year");
        }
        carousel
    }
}
