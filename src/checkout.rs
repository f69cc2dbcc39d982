//! Checkout
//!
//! Converts the cart's pending bookings into a payment record and
//! empties the cart. Payments are in-memory snapshots only; real
//! payment processing lives outside this crate.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cart::{Cart, CartItem};

/// Checkout errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout was attempted on an empty cart.
    #[error("cart is empty; nothing to pay for")]
    EmptyCart,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit or debit card.
    CreditCard,

    /// E-wallet.
    Wallet,

    /// Direct bank transfer.
    BankTransfer,
}

/// Lifecycle state of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Created but not settled.
    Pending,

    /// Settled.
    Completed,

    /// Rejected or aborted.
    Failed,
}

/// A snapshot of a checked-out cart.
#[derive(Debug, Clone)]
pub struct Payment<'a> {
    /// Payment id.
    pub id: String,

    /// The bookings as they were at checkout.
    pub items: Vec<CartItem<'a>>,

    /// Cart total at checkout.
    pub total: Money<'a, Currency>,

    /// How the payment was made.
    pub method: PaymentMethod,

    /// Lifecycle state.
    pub status: PaymentStatus,

    /// When the payment was taken.
    pub paid_at: Timestamp,

    /// Free-form note for display in the history.
    pub notes: Option<String>,
}

/// Check out the cart: snapshot its items and total into a completed
/// [`Payment`] and clear it.
///
/// The items and total are copied verbatim; the cart is empty afterwards
/// and the payment record never changes when the cart does.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing to pay for;
/// the cart is left untouched in that case.
pub fn checkout<'a>(
    cart: &mut Cart<'a>,
    id: impl Into<String>,
    method: PaymentMethod,
    paid_at: Timestamp,
) -> Result<Payment<'a>, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let id = id.into();
    let items = cart.items().to_vec();
    let total = cart.total_price();

    cart.clear();

    debug!(id = %id, items = items.len(), "checked out cart");

    Ok(Payment {
        id,
        items,
        total,
        method,
        status: PaymentStatus::Completed,
        paid_at,
        notes: None,
    })
}

/// Session-local payment history.
#[derive(Debug, Default)]
pub struct PaymentHistory<'a> {
    payments: Vec<Payment<'a>>,
}

impl<'a> PaymentHistory<'a> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            payments: Vec::new(),
        }
    }

    /// Record a payment.
    pub fn add(&mut self, payment: Payment<'a>) {
        self.payments.push(payment);
    }

    /// Look up a payment by id.
    pub fn by_id(&self, id: &str) -> Option<&Payment<'a>> {
        self.payments.iter().find(|payment| payment.id == id)
    }

    /// Return the payments newest first, for display.
    pub fn newest_first(&self) -> Vec<&Payment<'a>> {
        let mut payments: Vec<&Payment<'a>> = self.payments.iter().collect();

        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));

        payments
    }

    /// Iterate over the payments in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Payment<'a>> {
        self.payments.iter()
    }

    /// Number of recorded payments.
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    /// Whether no payments have been recorded.
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::iso::VND;
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{booking::BookingWindow, pricing::RateCard, vehicles::VehicleKey};

    use super::*;

    fn filled_cart() -> TestResult<Cart<'static>> {
        let mut slots: SlotMap<VehicleKey, ()> = SlotMap::with_key();
        let key = slots.insert(());

        let window = BookingWindow::new(date(2024, 6, 10), date(2024, 6, 13))?;
        let card = RateCard::flat(Money::from_minor(300_000, VND));
        let quote = card.quote(window.days());

        let mut cart = Cart::new(VND);
        cart.add(CartItem::new("1_100", key, "Honda Vision", window, &quote));

        Ok(cart)
    }

    fn timestamp(s: &str) -> TestResult<Timestamp> {
        Ok(s.parse()?)
    }

    #[test]
    fn checkout_snapshots_and_clears_the_cart() -> TestResult {
        let mut cart = filled_cart()?;
        let total_before = cart.total_price();

        let payment = checkout(
            &mut cart,
            "PAY001",
            PaymentMethod::CreditCard,
            timestamp("2024-12-20T10:30:00Z")?,
        )?;

        assert_eq!(payment.id, "PAY001");
        assert_eq!(payment.total, total_before);
        assert_eq!(payment.items.len(), 1);
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn later_cart_changes_do_not_touch_the_payment() -> TestResult {
        let mut cart = filled_cart()?;

        let payment = checkout(
            &mut cart,
            "PAY001",
            PaymentMethod::Wallet,
            timestamp("2024-12-20T10:30:00Z")?,
        )?;

        let mut refill = filled_cart()?;
        cart.add(match refill.items().first() {
            Some(item) => item.clone(),
            None => panic!("refill cart should hold an item"),
        });
        refill.clear();

        assert_eq!(payment.items.len(), 1);
        assert_eq!(payment.total, Money::from_minor(900_000, VND));

        Ok(())
    }

    #[test]
    fn empty_cart_refuses_checkout() -> TestResult {
        let mut cart = Cart::new(VND);

        let result = checkout(
            &mut cart,
            "PAY001",
            PaymentMethod::CreditCard,
            timestamp("2024-12-20T10:30:00Z")?,
        );

        assert_eq!(result.err(), Some(CheckoutError::EmptyCart));

        Ok(())
    }

    #[test]
    fn history_returns_payments_newest_first() -> TestResult {
        let mut history = PaymentHistory::new();

        for (id, at) in [
            ("PAY001", "2024-12-19T15:45:00Z"),
            ("PAY002", "2024-12-20T10:30:00Z"),
            ("PAY003", "2024-12-18T08:00:00Z"),
        ] {
            let mut cart = filled_cart()?;

            history.add(checkout(
                &mut cart,
                id,
                PaymentMethod::Wallet,
                timestamp(at)?,
            )?);
        }

        let ids: Vec<&str> = history
            .newest_first()
            .iter()
            .map(|payment| payment.id.as_str())
            .collect();

        assert_eq!(ids, vec!["PAY002", "PAY001", "PAY003"]);

        Ok(())
    }

    #[test]
    fn history_lookup_by_id() -> TestResult {
        let mut history = PaymentHistory::new();
        let mut cart = filled_cart()?;

        history.add(checkout(
            &mut cart,
            "PAY001",
            PaymentMethod::BankTransfer,
            timestamp("2024-12-20T10:30:00Z")?,
        )?);

        assert!(history.by_id("PAY001").is_some());
        assert!(history.by_id("PAY999").is_none());
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());

        Ok(())
    }
}
