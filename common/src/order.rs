use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;
use crate::checkout::ShippingDetails;
use crate::money::format_inr;

/// Default prefix of generated order IDs.
pub const ORDER_ID_PREFIX: &str = "KHOZZA";

static UPI_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("pattern is valid"));

/// Order identifier of the form `PREFIX-YYYYMMDD-NNNN`.
///
/// The suffix is random in 1000..=9999 and is not checked against earlier
/// orders, so two orders on the same day may collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn generate<R: Rng + ?Sized>(prefix: &str, date: NaiveDate, rng: &mut R) -> Self {
        let suffix: u16 = rng.gen_range(1000..=9999);
        OrderId(format!("{prefix}-{}-{suffix}", date.format("%Y%m%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate an order ID for today's local date using the thread RNG.
#[cfg(feature = "std")]
pub fn generate_order_id(prefix: &str) -> OrderId {
    let today = chrono::Local::now().date_naive();
    OrderId::generate(prefix, today, &mut rand::thread_rng())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("UPI reference must be exactly 12 digits")]
pub struct InvalidUpiRef;

/// A 12-digit UPI transaction reference entered as proof of payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpiRef(String);

impl UpiRef {
    pub fn parse(input: &str) -> Result<Self, InvalidUpiRef> {
        if UPI_REF.is_match(input) {
            Ok(UpiRef(input.to_string()))
        } else {
            Err(InvalidUpiRef)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Orders only ever exist in the confirmed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Confirmed,
}

/// A confirmed order, appended to the persisted order history and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(flatten)]
    pub shipping: ShippingDetails,
    /// Snapshot of the cart at confirmation time.
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub upi_ref: UpiRef,
}

impl Order {
    /// Number of distinct cart lines in the order.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// One-line summary shown on the confirmation view.
    pub fn summary_line(&self) -> String {
        format!(
            "Total Items: {} — {}",
            self.item_count(),
            format_inr(self.total_amount)
        )
    }
}
