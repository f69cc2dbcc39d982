//! Vehicles
//!
//! Read-only reference data describing the rental fleet. Vehicles are
//! addressed internally by [`VehicleKey`]; catalog id strings exist only
//! at the boundary.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::pricing::RateCard;

new_key_type! {
    /// Vehicle Key
    pub struct VehicleKey;
}

/// Availability status of a vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    /// Available for new bookings.
    #[default]
    Available,

    /// Currently rented out.
    Rented,

    /// Undergoing maintenance.
    Maintenance,
}

/// A geographic point for map display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,
}

/// Vehicle
#[derive(Debug, Clone)]
pub struct Vehicle<'a> {
    /// Vehicle display name
    pub name: String,

    /// Availability status
    pub status: VehicleStatus,

    /// Position for map display
    pub location: Location,

    /// Human-readable pickup address
    pub address: String,

    /// Image URL for display
    pub image_url: String,

    /// Flat rate plus duration tiers
    pub rates: RateCard<'a>,
}

impl Vehicle<'_> {
    /// Whether new bookings can be placed for this vehicle.
    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}
