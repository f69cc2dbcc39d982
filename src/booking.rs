//! Bookings
//!
//! Calendar-date booking windows and the booking flow that ties the
//! catalog, conflict check and pricing together: a request is validated,
//! checked against the cart's pending bookings for the same vehicle,
//! quoted, and only then added to the cart.

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem, ConflictCheck},
    catalog::Catalog,
};

/// Errors surfaced by the booking flow.
///
/// All of these are advisory outcomes for the caller to display; none
/// of them leave the cart in a modified state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    /// The requested window ends before it starts.
    #[error("booking window ends {end} before it starts {start}")]
    EndBeforeStart {
        /// Requested start date.
        start: Date,
        /// Requested end date.
        end: Date,
    },

    /// The requested vehicle id is not in the catalog.
    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),

    /// The vehicle exists but is rented out or under maintenance.
    #[error("vehicle {0} is not available for rental")]
    Unavailable(String),

    /// The window overlaps a pending booking for the same vehicle.
    #[error("{message}")]
    Conflict {
        /// Advisory message for display.
        message: String,
    },
}

/// An inclusive calendar-date range for a single rental.
///
/// A same-day window (`start == end`) is a valid 1-day rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingWindow {
    start: Date,
    end: Date,
}

impl BookingWindow {
    /// Create a booking window.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::EndBeforeStart`] if `end` precedes `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, BookingError> {
        if end < start {
            return Err(BookingError::EndBeforeStart { start, end });
        }

        Ok(Self { start, end })
    }

    /// Return the first rental day.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Return the last rental day.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Return the billed number of whole days, minimum 1.
    ///
    /// A same-day window bills as a single day.
    pub fn days(&self) -> i64 {
        i64::from((self.end - self.start).get_days()).max(1)
    }

    /// Whether two windows share at least one calendar day.
    ///
    /// Both ranges are treated as closed intervals, so windows that
    /// merely touch at a boundary date do overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// A candidate booking as collected at the UI boundary.
///
/// Dates are ISO-8601 calendar dates, clock times 24-hour `HH:MM`; the
/// split date/time fields exist only here and are folded into a
/// [`BookingWindow`] internally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingRequest {
    /// Catalog id of the requested vehicle.
    pub vehicle: String,

    /// First rental day.
    pub start_date: Date,

    /// Last rental day.
    pub end_date: Date,

    /// Pickup time on the first day.
    #[serde(default)]
    pub start_time: Option<Time>,

    /// Return time on the last day.
    #[serde(default)]
    pub end_time: Option<Time>,

    /// Pickup location; defaults to the vehicle's address.
    #[serde(default)]
    pub pickup_location: Option<String>,
}

/// Run the booking flow: validate, conflict-check, quote, add to cart.
///
/// On success the new pending booking is in the cart and a copy is
/// returned for display. The cart is untouched on any error. Item ids
/// follow the `"<vehicle-id>_<epoch-millis>"` scheme derived from
/// `booked_at`.
///
/// # Errors
///
/// - [`BookingError::UnknownVehicle`]: the vehicle id is not in the catalog.
/// - [`BookingError::Unavailable`]: the vehicle is rented out or under maintenance.
/// - [`BookingError::EndBeforeStart`]: the requested window is inverted.
/// - [`BookingError::Conflict`]: the window overlaps a pending booking
///   for the same vehicle.
#[tracing::instrument(skip(catalog, cart), fields(vehicle = %request.vehicle))]
pub fn place_booking<'a>(
    catalog: &Catalog<'a>,
    cart: &mut Cart<'a>,
    request: &BookingRequest,
    booked_at: Timestamp,
) -> Result<CartItem<'a>, BookingError> {
    let key = catalog
        .key(&request.vehicle)
        .ok_or_else(|| BookingError::UnknownVehicle(request.vehicle.clone()))?;

    let vehicle = catalog
        .vehicle(key)
        .ok_or_else(|| BookingError::UnknownVehicle(request.vehicle.clone()))?;

    if !vehicle.is_available() {
        return Err(BookingError::Unavailable(request.vehicle.clone()));
    }

    let window = BookingWindow::new(request.start_date, request.end_date)?;

    if let ConflictCheck::Conflict { message } = cart.check_booking_conflict(key, &window) {
        return Err(BookingError::Conflict { message });
    }

    let quote = vehicle.rates.quote(window.days());

    let pickup = request
        .pickup_location
        .clone()
        .unwrap_or_else(|| vehicle.address.clone());

    let id = format!("{}_{}", request.vehicle, booked_at.as_millisecond());

    let mut item = CartItem::new(id, key, vehicle.name.clone(), window, &quote)
        .with_pickup(pickup)
        .with_image_url(vehicle.image_url.clone());

    if let (Some(start), Some(end)) = (request.start_time, request.end_time) {
        item = item.with_times(start, end);
    }

    cart.add(item.clone());

    Ok(item)
}
