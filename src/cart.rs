//! Cart
//!
//! The session-scoped collection of pending (unpaid) bookings. The cart
//! is an explicit value constructed once per session and passed by
//! reference to whoever needs it; there is no ambient state. Conflict
//! checking is a pure query over the current items and is deliberately
//! separate from [`Cart::add`], which never fails.

use jiff::civil::Time;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{booking::BookingWindow, pricing::Quote, vehicles::VehicleKey};

/// Advisory text shown when a candidate booking overlaps a pending one.
pub const CONFLICT_MESSAGE: &str =
    "This vehicle is already booked for the selected dates. Please choose a different period.";

/// Outcome of a booking conflict check.
///
/// Callers branch only on the variant; the message is advisory display
/// text, not a structured error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictCheck {
    /// No pending booking for the vehicle overlaps the candidate window.
    Clear,

    /// The candidate window overlaps a pending booking.
    Conflict {
        /// Advisory message for display.
        message: String,
    },
}

impl ConflictCheck {
    /// Whether a conflict was found.
    pub fn has_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Return the advisory message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Clear => None,
            Self::Conflict { message } => Some(message),
        }
    }
}

/// A pending booking held in the cart.
///
/// The price fields are fixed at creation from a [`Quote`], so
/// `total_price == price_per_day * days` holds when the item is built;
/// they are stored, not recomputed later.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    id: String,
    vehicle: VehicleKey,
    vehicle_name: String,
    window: BookingWindow,
    start_time: Option<Time>,
    end_time: Option<Time>,
    pickup_location: String,
    days: i64,
    price_per_day: Money<'a, Currency>,
    total_price: Money<'a, Currency>,
    image_url: String,
}

impl<'a> CartItem<'a> {
    /// Create a pending booking from a resolved quote.
    pub fn new(
        id: impl Into<String>,
        vehicle: VehicleKey,
        vehicle_name: impl Into<String>,
        window: BookingWindow,
        quote: &Quote<'a>,
    ) -> Self {
        Self {
            id: id.into(),
            vehicle,
            vehicle_name: vehicle_name.into(),
            window,
            start_time: None,
            end_time: None,
            pickup_location: String::new(),
            days: quote.days(),
            price_per_day: *quote.price_per_day(),
            total_price: *quote.total(),
            image_url: String::new(),
        }
    }

    /// Set the pickup location.
    #[must_use]
    pub fn with_pickup(mut self, location: impl Into<String>) -> Self {
        self.pickup_location = location.into();
        self
    }

    /// Set the pickup and return clock times.
    #[must_use]
    pub fn with_times(mut self, start: Time, end: Time) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Set the vehicle image URL for display.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Return the unique item id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the booked vehicle.
    pub fn vehicle(&self) -> VehicleKey {
        self.vehicle
    }

    /// Return the vehicle's display name.
    pub fn vehicle_name(&self) -> &str {
        &self.vehicle_name
    }

    /// Return the booked date range.
    pub fn window(&self) -> &BookingWindow {
        &self.window
    }

    /// Return the pickup time, if one was chosen.
    pub fn start_time(&self) -> Option<Time> {
        self.start_time
    }

    /// Return the return time, if one was chosen.
    pub fn end_time(&self) -> Option<Time> {
        self.end_time
    }

    /// Return the pickup location.
    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    /// Return the billed number of days.
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Return the day rate fixed at booking time.
    pub fn price_per_day(&self) -> &Money<'a, Currency> {
        &self.price_per_day
    }

    /// Return the total price fixed at booking time.
    pub fn total_price(&self) -> &Money<'a, Currency> {
        &self.total_price
    }

    /// Return the vehicle image URL.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    // Upsert identity: one cart line per vehicle and date range.
    fn booking_key(&self) -> (VehicleKey, BookingWindow) {
        (self.vehicle, self.window)
    }
}

/// The session-scoped cart of pending bookings.
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart for the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add a pending booking, upserting by `(vehicle, window)`.
    ///
    /// An item matching an existing vehicle and date range replaces that
    /// entry in place, preserving its position; otherwise the item is
    /// appended. No conflict check happens here: callers run
    /// [`Cart::check_booking_conflict`] first and abort on a conflict,
    /// which is what lets this operation never fail.
    pub fn add(&mut self, item: CartItem<'a>) {
        let key = item.booking_key();

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|existing| existing.booking_key() == key)
        {
            debug!(id = %item.id(), replaced = %existing.id(), "replacing pending booking");
            *existing = item;
        } else {
            debug!(id = %item.id(), "adding pending booking");
            self.items.push(item);
        }
    }

    /// Remove the item with the given id; silently a no-op when absent.
    pub fn remove(&mut self, item_id: &str) {
        let before = self.items.len();

        self.items.retain(|item| item.id() != item_id);

        if self.items.len() < before {
            debug!(id = %item_id, "removed pending booking");
        }
    }

    /// Empty the cart; used after checkout.
    pub fn clear(&mut self) {
        debug!(items = self.items.len(), "clearing cart");
        self.items.clear();
    }

    /// Whether a candidate window collides with a pending booking for
    /// the same vehicle.
    ///
    /// Pure query: only items for `vehicle` are considered, each as an
    /// inclusive date interval. Bookings for other vehicles never
    /// conflict, and the cart knows nothing about other sessions.
    pub fn check_booking_conflict(
        &self,
        vehicle: VehicleKey,
        window: &BookingWindow,
    ) -> ConflictCheck {
        let conflict = self
            .items
            .iter()
            .filter(|item| item.vehicle() == vehicle)
            .any(|item| item.window().overlaps(window));

        if conflict {
            ConflictCheck::Conflict {
                message: CONFLICT_MESSAGE.to_string(),
            }
        } else {
            ConflictCheck::Clear
        }
    }

    /// Sum of the items' total prices; zero for an empty cart.
    pub fn total_price(&self) -> Money<'a, Currency> {
        let minor = self
            .items
            .iter()
            .fold(0_i64, |acc, item| {
                acc.saturating_add(item.total_price().to_minor_units())
            });

        Money::from_minor(minor, self.currency)
    }

    /// Number of pending bookings.
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no pending bookings.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the pending bookings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Return the pending bookings in insertion order.
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Return the cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
