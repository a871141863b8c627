use std::fmt;

use thiserror::Error;

/// Page elements the storefront reads from or renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Nav,
    Hamburger,
    Year,
    Carousel,
    CartItems,
    TotalAmount,
    ProductSummary,
    /// Layout row next to the product summary, hidden when the cart is empty.
    SummaryRow,
    Name,
    Phone,
    CountryCode,
    Pincode,
    Address,
    NameError,
    PhoneError,
    PincodeError,
    AddressError,
    UpiRefError,
    LoadingOverlay,
    Countdown,
    CheckoutCard,
    UpiSection,
    UpiAmount,
    UpiRef,
    OrderConfirm,
    OrderNum,
    OrderDetails,
}

impl Target {
    /// CSS selector locating the element in the page.
    pub fn selector(self) -> &'static str {
        match self {
            Target::Nav => "#nav",
            Target::Hamburger => ".hamburger",
            Target::Year => "#yr",
            Target::Carousel => ".swiper",
            Target::CartItems => "#cartItems",
            Target::TotalAmount => "#totalAmount",
            Target::ProductSummary => "#productSummary",
            Target::SummaryRow => ".row",
            Target::Name => "#name",
            Target::Phone => "#phone",
            Target::CountryCode => "#countryCode",
            Target::Pincode => "#pincode",
            Target::Address => "#address",
            Target::NameError => "#nameError",
            Target::PhoneError => "#phoneError",
            Target::PincodeError => "#pincodeError",
            Target::AddressError => "#addressError",
            Target::UpiRefError => "#upiRefError",
            Target::LoadingOverlay => "#loadingOverlay",
            Target::Countdown => "#countdown",
            Target::CheckoutCard => "#checkoutCard",
            Target::UpiSection => "#upiSection",
            Target::UpiAmount => "#upiAmount",
            Target::UpiRef => "#upiRef",
            Target::OrderConfirm => "#orderConfirm",
            Target::OrderNum => "#orderNum",
            Target::OrderDetails => "#orderDetails",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// CSS `display` values the storefront switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    None,
    Block,
    Flex,
}

impl DisplayMode {
    pub fn as_css(self) -> &'static str {
        match self {
            DisplayMode::None => "none",
            DisplayMode::Block => "block",
            DisplayMode::Flex => "flex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("required element {0} is missing from the page")]
    MissingTarget(Target),
    #[error("element {target} rejected the update: {reason}")]
    Rejected { target: Target, reason: String },
}

/// The page the storefront renders into.
///
/// Every element access is fallible so a missing element surfaces as
/// [`SurfaceError::MissingTarget`] instead of aborting the handler.
pub trait Surface {
    fn contains(&self, target: Target) -> bool;

    fn set_text(&mut self, target: Target, text: &str) -> Result<(), SurfaceError>;

    /// Replace the element's children with pre-escaped markup.
    fn set_html(&mut self, target: Target, html: &str) -> Result<(), SurfaceError>;

    fn set_display(&mut self, target: Target, mode: DisplayMode) -> Result<(), SurfaceError>;

    /// Set an attribute, or remove it when `value` is `None`.
    fn set_attribute(
        &mut self,
        target: Target,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), SurfaceError>;

    /// Toggle a class, returning whether it is now present.
    fn toggle_class(&mut self, target: Target, class: &str) -> Result<bool, SurfaceError>;

    /// Current value of a form control.
    fn value(&self, target: Target) -> Result<String, SurfaceError>;

    /// Current text content of an element.
    fn text(&self, target: Target) -> Result<String, SurfaceError>;

    /// Blocking user notice.
    fn alert(&mut self, message: &str);

    fn navigate(&mut self, href: &str);

    /// Start fetching images in the background. Best effort, never fails.
    fn preload_images(&mut self, urls: &[String]);
}
