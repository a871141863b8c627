use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::surface::Target;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("pattern is valid"));
static PINCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5,10}$").expect("pattern is valid"));
static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script>").expect("pattern is valid"));

/// A required checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Pincode,
    Address,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Phone, Field::Pincode, Field::Address];

    /// The input element holding this field's value.
    pub fn input(self) -> Target {
        match self {
            Field::Name => Target::Name,
            Field::Phone => Target::Phone,
            Field::Pincode => Target::Pincode,
            Field::Address => Target::Address,
        }
    }

    /// The element that shows this field's error text.
    pub fn error_target(self) -> Target {
        match self {
            Field::Name => Target::NameError,
            Field::Phone => Target::PhoneError,
            Field::Pincode => Target::PincodeError,
            Field::Address => Target::AddressError,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Field::Name => "Full name is required.",
            Field::Phone => "Valid phone number is required (digits only).",
            Field::Pincode => "Valid pincode is required (5-10 digits).",
            Field::Address => "Full address is required.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field) -> Self {
        Self {
            field,
            message: field.message(),
        }
    }
}

/// Shipping and contact details staged between form validation and payment
/// confirmation. Flattened into the persisted order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    /// Country code followed by the subscriber digits, e.g. "+919876543210".
    pub phone: String,
    pub pincode: String,
    pub address: String,
}

/// Raw values as read from the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub country_code: String,
    pub pincode: String,
    pub address: String,
}

impl CheckoutForm {
    /// Validate every field and collect all failures, so each applicable error
    /// can be shown at once. The country code is passed through unchecked.
    pub fn validate(&self) -> Result<ShippingDetails, Vec<FieldError>> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        let pincode = self.pincode.trim();
        let address = self.address.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new(Field::Name));
        }
        if !DIGITS.is_match(phone) {
            errors.push(FieldError::new(Field::Phone));
        }
        if !PINCODE.is_match(pincode) {
            errors.push(FieldError::new(Field::Pincode));
        }
        if address.is_empty() {
            errors.push(FieldError::new(Field::Address));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ShippingDetails {
            name: strip_script_tags(name),
            phone: format!("{}{}", self.country_code, strip_script_tags(phone)),
            pincode: strip_script_tags(pincode),
            address: strip_script_tags(address),
        })
    }
}

/// Remove literal `<script>` tags (any case). This only blunts the most naive
/// injection; rendered text is escaped separately.
pub fn strip_script_tags(input: &str) -> String {
    SCRIPT_TAG.replace_all(input, "").into_owned()
}
