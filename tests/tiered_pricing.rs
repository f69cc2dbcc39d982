//! Integration tests for tiered price resolution against the shipped
//! vehicle catalog.
//!
//! The Honda Vision carries the canonical four-tier table:
//!
//! - 1-4 days at 300,000 VND/day
//! - 5-14 days at 250,000 VND/day
//! - 15-29 days at 200,000 VND/day
//! - 30+ days (open-ended) at 130,000 VND/day

use rusty_money::{Money, iso::VND};
use testresult::TestResult;

use kickstand::{
    catalog::Catalog,
    pricing::{PricingTier, RateCard},
};

fn vision_rates() -> TestResult<RateCard<'static>> {
    let catalog = Catalog::load("./fixtures/vehicles.yml")?;

    match catalog.get("honda-vision") {
        Some(vehicle) => Ok(vehicle.rates.clone()),
        None => panic!("honda-vision missing from fixture"),
    }
}

#[test]
fn three_day_rental_prices_at_the_short_tier() -> TestResult {
    let rates = vision_rates()?;
    let quote = rates.quote(3);

    assert_eq!(quote.price_per_day(), &Money::from_minor(300_000, VND));
    assert_eq!(quote.total(), &Money::from_minor(900_000, VND));

    Ok(())
}

#[test]
fn thirty_day_rental_prices_at_the_monthly_tier() -> TestResult {
    let rates = vision_rates()?;
    let quote = rates.quote(30);

    assert_eq!(quote.price_per_day(), &Money::from_minor(130_000, VND));

    Ok(())
}

#[test]
fn very_long_rental_stays_on_the_open_ended_tier() -> TestResult {
    let rates = vision_rates()?;

    assert_eq!(rates.price_per_day(10_000), Money::from_minor(130_000, VND));

    Ok(())
}

#[test]
fn every_duration_resolves_to_exactly_one_covering_tier() -> TestResult {
    let rates = vision_rates()?;

    for days in 1..=120 {
        let covering: Vec<&PricingTier<'_>> = rates
            .tiers()
            .iter()
            .filter(|tier| tier.covers(days))
            .collect();

        assert_eq!(
            covering.len(),
            1,
            "day count {days} should be covered by exactly one tier"
        );

        match covering.first() {
            Some(tier) => assert_eq!(
                rates.price_per_day(days),
                *tier.price_per_day(),
                "resolver disagreed with the covering tier for {days} days"
            ),
            None => unreachable!(),
        }
    }

    Ok(())
}

#[test]
fn untiered_vehicle_always_prices_at_its_flat_rate() -> TestResult {
    let catalog = Catalog::load("./fixtures/vehicles.yml")?;

    let vario = match catalog.get("vario-150") {
        Some(vehicle) => vehicle,
        None => panic!("vario-150 missing from fixture"),
    };

    assert!(vario.rates.tiers().is_empty());

    for days in [1, 5, 15, 30, 365] {
        assert_eq!(
            vario.rates.price_per_day(days),
            Money::from_minor(300_000, VND)
        );
    }

    Ok(())
}
