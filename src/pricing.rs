//! Tiered Pricing
//!
//! A vehicle's day rate depends on how long it is rented for: catalogs
//! express this as tiers such as "1-4 days at 300,000, 5-14 days at
//! 250,000, 30+ days at 130,000". [`RateCard`] resolves a rental
//! duration to the applicable rate and produces a [`Quote`].

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

/// A single duration tier within a rate card.
///
/// A tier matches rentals whose whole-day duration falls in
/// `min_days..=max_days`; a tier without `max_days` is open-ended
/// (e.g. "from 30 days").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingTier<'a> {
    min_days: u32,
    max_days: Option<u32>,
    price_per_day: Money<'a, Currency>,
}

impl<'a> PricingTier<'a> {
    /// Create a new pricing tier.
    #[must_use]
    pub fn new(min_days: u32, max_days: Option<u32>, price_per_day: Money<'a, Currency>) -> Self {
        Self {
            min_days,
            max_days,
            price_per_day,
        }
    }

    /// Return the shortest duration this tier covers.
    pub fn min_days(&self) -> u32 {
        self.min_days
    }

    /// Return the longest duration this tier covers, if bounded.
    pub fn max_days(&self) -> Option<u32> {
        self.max_days
    }

    /// Return the day rate for this tier.
    pub fn price_per_day(&self) -> &Money<'a, Currency> {
        &self.price_per_day
    }

    /// Whether a rental of the given duration falls in this tier.
    pub fn covers(&self, days: i64) -> bool {
        days >= i64::from(self.min_days)
            && self.max_days.is_none_or(|max| days <= i64::from(max))
    }
}

/// A vehicle's flat day rate plus its (possibly empty) duration tiers.
///
/// Tiers are sorted by `min_days` descending once at construction, so
/// resolution always scans longest-duration-first and an open-ended
/// "30+ days" tier wins over the 15-29 tier for a 30-day rental.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard<'a> {
    flat: Money<'a, Currency>,
    tiers: SmallVec<[PricingTier<'a>; 4]>,
}

impl<'a> RateCard<'a> {
    /// Create a rate card with duration tiers over a flat fallback rate.
    pub fn new(flat: Money<'a, Currency>, tiers: impl Into<Vec<PricingTier<'a>>>) -> Self {
        let mut tiers: SmallVec<[PricingTier<'a>; 4]> = SmallVec::from_vec(tiers.into());

        tiers.sort_by(|a, b| b.min_days.cmp(&a.min_days));

        Self { flat, tiers }
    }

    /// Create a rate card with a flat day rate and no tiers.
    #[must_use]
    pub fn flat(price_per_day: Money<'a, Currency>) -> Self {
        Self {
            flat: price_per_day,
            tiers: SmallVec::new(),
        }
    }

    /// Return the flat day rate used when no tiers are defined.
    pub fn flat_rate(&self) -> &Money<'a, Currency> {
        &self.flat
    }

    /// Return the tiers, sorted by `min_days` descending.
    pub fn tiers(&self) -> &[PricingTier<'a>] {
        &self.tiers
    }

    /// Return the currency of this rate card.
    pub fn currency(&self) -> &'a Currency {
        self.flat.currency()
    }

    /// Resolve the day rate for a rental of the given whole-day duration.
    ///
    /// Tiers are scanned longest-duration-first. If the tier data is
    /// gapped and nothing matches, the shortest-duration tier's rate is
    /// returned as a safe fallback rather than failing. With no tiers at
    /// all, the flat rate applies. Total over every `days >= 1`.
    pub fn price_per_day(&self, days: i64) -> Money<'a, Currency> {
        for tier in &self.tiers {
            if tier.covers(days) {
                return tier.price_per_day;
            }
        }

        // Gapped tier data: fall back to the shortest-duration tier,
        // which is the last entry after the descending sort.
        self.tiers
            .last()
            .map_or(self.flat, |tier| tier.price_per_day)
    }

    /// Quote a rental of the given duration.
    ///
    /// Durations below 1 are clamped to the 1-day minimum. The total is
    /// computed in integer minor units.
    pub fn quote(&self, days: i64) -> Quote<'a> {
        let days = days.max(1);
        let price_per_day = self.price_per_day(days);

        let total_minor = price_per_day.to_minor_units().saturating_mul(days);
        let total = Money::from_minor(total_minor, price_per_day.currency());

        Quote {
            days,
            price_per_day,
            total,
        }
    }
}

/// A resolved price for a rental of a specific duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote<'a> {
    days: i64,
    price_per_day: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> Quote<'a> {
    /// Return the billed number of days.
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Return the resolved day rate.
    pub fn price_per_day(&self) -> &Money<'a, Currency> {
        &self.price_per_day
    }

    /// Return the total price (`price_per_day * days`).
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }
}
