//! Catalog
//!
//! The vehicle catalog: reference data the booking flow reads but never
//! writes. Catalogs are loaded from YAML records with `"AMOUNT CODE"`
//! price strings, and every vehicle must share a single currency.

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    pricing::{PricingTier, RateCard},
    vehicles::{Location, Vehicle, VehicleKey, VehicleStatus},
};

/// Catalog loading and lookup errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between vehicles or tiers
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// A vehicle id was used twice
    #[error("Duplicate vehicle id: {0}")]
    DuplicateVehicle(String),

    /// A tier record with impossible bounds
    #[error("Invalid pricing tier: {0}")]
    InvalidTier(String),
}

/// Wrapper for vehicles in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    /// Map of vehicle id -> vehicle record
    pub vehicles: FxHashMap<String, VehicleRecord>,
}

/// Vehicle record from YAML
#[derive(Debug, Deserialize)]
pub struct VehicleRecord {
    /// Vehicle display name
    pub name: String,

    /// Flat day rate (e.g., "300000 VND")
    pub price: String,

    /// Availability status; available unless stated
    #[serde(default)]
    pub status: VehicleStatus,

    /// Human-readable pickup address
    #[serde(default)]
    pub address: String,

    /// Position for map display
    #[serde(default)]
    pub location: Location,

    /// Image URL for display
    #[serde(default)]
    pub image: String,

    /// Duration tiers; empty means the flat rate always applies
    #[serde(default)]
    pub tiers: Vec<TierRecord>,
}

/// Duration tier record from YAML
#[derive(Debug, Deserialize)]
pub struct TierRecord {
    /// Shortest duration the tier covers
    pub min_days: u32,

    /// Longest duration the tier covers; absent means open-ended
    #[serde(default)]
    pub max_days: Option<u32>,

    /// Day rate for the tier (e.g., "250000 VND")
    pub price: String,
}

impl TryFrom<VehicleRecord> for Vehicle<'_> {
    type Error = CatalogError;

    fn try_from(record: VehicleRecord) -> Result<Self, Self::Error> {
        let (flat_minor, currency) = parse_price(&record.price)?;
        let flat = Money::from_minor(flat_minor, currency);

        let mut tiers = Vec::with_capacity(record.tiers.len());

        for tier in record.tiers {
            if tier.min_days == 0 {
                return Err(CatalogError::InvalidTier(format!(
                    "min_days must be at least 1 in {}",
                    record.name
                )));
            }

            if let Some(max) = tier.max_days
                && max < tier.min_days
            {
                return Err(CatalogError::InvalidTier(format!(
                    "max_days {max} is below min_days {} in {}",
                    tier.min_days, record.name
                )));
            }

            let (minor, tier_currency) = parse_price(&tier.price)?;

            if tier_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    tier_currency.iso_alpha_code.to_string(),
                ));
            }

            tiers.push(PricingTier::new(
                tier.min_days,
                tier.max_days,
                Money::from_minor(minor, tier_currency),
            ));
        }

        Ok(Vehicle {
            name: record.name,
            status: record.status,
            location: record.location,
            address: record.address,
            image_url: record.image,
            rates: RateCard::new(flat, tiers),
        })
    }
}

/// Parse a price string (e.g., "300000 VND") into minor units and currency.
///
/// The amount is scaled by the ISO currency exponent, so `"2.99 GBP"`
/// yields 299 minor units while `"300000 VND"` stays 300,000 (VND has
/// no subunits).
///
/// # Errors
///
/// Returns an error if the string is not in `"AMOUNT CODE"` form, if the
/// amount does not parse as a decimal, or if the currency code is not a
/// known ISO code.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let currency =
        iso::find(currency_code).ok_or_else(|| CatalogError::UnknownCurrency((*currency_code).to_string()))?;

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Catalog
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    vehicles: SlotMap<VehicleKey, Vehicle<'a>>,

    /// String id -> `SlotMap` key mapping for boundary lookups
    keys: FxHashMap<String, VehicleKey>,

    /// Currency shared by every vehicle, set on first insert
    currency: Option<&'a Currency>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vehicles: SlotMap::with_key(),
            keys: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any
    /// record is rejected by [`Catalog::insert`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, or if any record
    /// is rejected by [`Catalog::insert`].
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;
        let mut catalog = Self::new();

        for (id, record) in file.vehicles {
            let vehicle = record.try_into()?;

            catalog.insert(&id, vehicle)?;
        }

        Ok(catalog)
    }

    /// Insert a vehicle under a boundary id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the vehicle's
    /// currency differs from the catalog's.
    pub fn insert(&mut self, id: &str, vehicle: Vehicle<'a>) -> Result<VehicleKey, CatalogError> {
        if self.keys.contains_key(id) {
            return Err(CatalogError::DuplicateVehicle(id.to_string()));
        }

        let currency = vehicle.rates.currency();

        if let Some(existing) = self.currency {
            if existing != currency {
                return Err(CatalogError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        let key = self.vehicles.insert(vehicle);

        self.keys.insert(id.to_string(), key);

        Ok(key)
    }

    /// Resolve a boundary id to a vehicle key.
    pub fn key(&self, id: &str) -> Option<VehicleKey> {
        self.keys.get(id).copied()
    }

    /// Look up a vehicle by boundary id.
    pub fn get(&self, id: &str) -> Option<&Vehicle<'a>> {
        self.vehicles.get(self.key(id)?)
    }

    /// Look up a vehicle by key.
    pub fn vehicle(&self, key: VehicleKey) -> Option<&Vehicle<'a>> {
        self.vehicles.get(key)
    }

    /// Iterate over the vehicles.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleKey, &Vehicle<'a>)> {
        self.vehicles.iter()
    }

    /// Number of vehicles in the catalog.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the catalog holds no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Return the catalog currency, once at least one vehicle is loaded.
    pub fn currency(&self) -> Option<&'a Currency> {
        self.currency
    }
}
