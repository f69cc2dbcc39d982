//! Kickstand
//!
//! Kickstand is a booking and tiered-pricing engine for vehicle rental
//! storefronts: a vehicle catalog with duration-tiered day rates, a
//! session-scoped cart of pending bookings with date-range conflict
//! detection, and checkout into in-memory payment records.

pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pricing;
pub mod vehicles;
