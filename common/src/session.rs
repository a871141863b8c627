//! Checkout state machine.
//!
//! ```text
//! Form --submit--> CountingDown(n..0) --tick at 0--> AwaitingUpiRef --confirm--> Confirmed
//!   ^                     |
//!   +------cancel---------+
//! ```
//!
//! Shipping details travel inside the state from the moment the form validates
//! until they are folded into the confirmed order.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::cart::CartItem;
use crate::checkout::ShippingDetails;
use crate::money::round_to_paise;
use crate::order::{Order, OrderId, OrderStatus, UpiRef};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    #[default]
    Form,
    CountingDown {
        remaining: u8,
        details: ShippingDetails,
        amount: f64,
    },
    AwaitingUpiRef {
        details: ShippingDetails,
        amount: f64,
    },
    Confirmed {
        order: Order,
    },
}

impl CheckoutState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Form => "form",
            CheckoutState::CountingDown { .. } => "counting down",
            CheckoutState::AwaitingUpiRef { .. } => "awaiting UPI reference",
            CheckoutState::Confirmed { .. } => "confirmed",
        }
    }
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Still counting; seconds left.
    Remaining(u8),
    /// Reached zero; the session now awaits the UPI reference.
    Elapsed,
    /// No countdown is running (never started, or cancelled).
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("cart is empty")]
    EmptyCart,
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    state: CheckoutState,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Stage validated details and start the payment countdown.
    pub fn begin_payment(
        &mut self,
        details: ShippingDetails,
        amount: f64,
        countdown_secs: u8,
    ) -> Result<u8, CheckoutError> {
        if self.state != CheckoutState::Form {
            return Err(self.invalid("submit the checkout form"));
        }
        tracing::debug!(countdown_secs, amount, "payment countdown started");
        self.state = CheckoutState::CountingDown {
            remaining: countdown_secs,
            details,
            amount,
        };
        Ok(countdown_secs)
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> CountdownStep {
        match std::mem::take(&mut self.state) {
            CheckoutState::CountingDown {
                remaining,
                details,
                amount,
            } if remaining > 1 => {
                self.state = CheckoutState::CountingDown {
                    remaining: remaining - 1,
                    details,
                    amount,
                };
                CountdownStep::Remaining(remaining - 1)
            }
            CheckoutState::CountingDown {
                details, amount, ..
            } => {
                tracing::debug!("payment countdown elapsed");
                self.state = CheckoutState::AwaitingUpiRef { details, amount };
                CountdownStep::Elapsed
            }
            other => {
                self.state = other;
                CountdownStep::Idle
            }
        }
    }

    /// Abort a running countdown and return to the form. Returns whether a
    /// countdown was running.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, CheckoutState::CountingDown { .. }) {
            tracing::debug!("payment countdown cancelled");
            self.state = CheckoutState::Form;
            true
        } else {
            false
        }
    }

    /// Amount to pay, once the countdown has elapsed.
    pub fn amount_due(&self) -> Option<f64> {
        match &self.state {
            CheckoutState::AwaitingUpiRef { amount, .. } => Some(*amount),
            _ => None,
        }
    }

    /// Build the order record from the staged details and a cart snapshot.
    /// The session itself does not move until [`complete`](Self::complete).
    pub fn build_order(
        &self,
        upi_ref: UpiRef,
        items: Vec<CartItem>,
        order_id: OrderId,
    ) -> Result<Order, CheckoutError> {
        let CheckoutState::AwaitingUpiRef { details, .. } = &self.state else {
            return Err(self.invalid("confirm an order"));
        };
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let total_amount = round_to_paise(items.iter().map(CartItem::subtotal).sum());
        Ok(Order {
            shipping: details.clone(),
            items,
            total_amount,
            order_id,
            status: OrderStatus::Confirmed,
            upi_ref,
        })
    }

    /// Record that `order` has been persisted.
    pub fn complete(&mut self, order: Order) -> Result<(), CheckoutError> {
        if !matches!(self.state, CheckoutState::AwaitingUpiRef { .. }) {
            return Err(self.invalid("complete an order"));
        }
        tracing::debug!(order_id = %order.order_id, "order confirmed");
        self.state = CheckoutState::Confirmed { order };
        Ok(())
    }

    pub fn confirmed_order(&self) -> Option<&Order> {
        match &self.state {
            CheckoutState::Confirmed { order } => Some(order),
            _ => None,
        }
    }
}

/// Drive a countdown: sleep one [`TICK_INTERVAL`], tick, repeat until the
/// countdown elapses or is no longer running.
///
/// `sleep` is the platform timer (`gloo_timers` in the browser,
/// `tokio::time::sleep` natively).
pub async fn drive_countdown<T, E, S, F>(mut tick: T, mut sleep: S) -> Result<(), E>
where
    T: FnMut() -> Result<CountdownStep, E>,
    S: FnMut(Duration) -> F,
    F: Future<Output = ()>,
{
    loop {
        sleep(TICK_INTERVAL).await;
        match tick()? {
            CountdownStep::Remaining(_) => {}
            CountdownStep::Elapsed | CountdownStep::Idle => return Ok(()),
        }
    }
}
