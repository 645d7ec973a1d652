//! Integration test for the pricing pipeline over the shipped tariff.
//!
//! Reference scenario, worked by hand:
//!
//! Yamaha R6 at Rp 700.000/day for 10 days, no driver, voucher HEMAT5:
//!
//! 1. subtotal            = 10 × 700.000            = 7.000.000
//! 2. tax (10%)           = floor(7.000.000 × 0,10) =   700.000
//! 3. before discount     = 7.000.000 + 700.000     = 7.700.000
//! 4. duration tier       = 10 days -> 5%
//! 5. duration discount   = floor(7.700.000 × 0,05) =   385.000
//! 6. after duration      = 7.700.000 - 385.000     = 7.315.000
//! 7. voucher HEMAT5 (5%) = floor(7.315.000 × 0,05) =   365.750
//! 8. grand total         = 7.315.000 - 365.750     = 6.949.250
//!
//! The discounts compound sequentially off running totals, never off the
//! original subtotal.

use rust_decimal::Decimal;
use testresult::TestResult;

use roda::catalog::Catalog;
use roda::currency::Rupiah;
use roda::pricing::{PricingEngine, Tariff, VoucherOutcome};

const CATALOG_FIXTURE_YAML: &str = include_str!("../fixtures/catalog.yml");
const TARIFF_FIXTURE_YAML: &str = include_str!("../fixtures/tariff.yml");

fn engine() -> Result<PricingEngine, testresult::TestError> {
    Ok(PricingEngine::new(Tariff::from_yaml(TARIFF_FIXTURE_YAML)?))
}

#[test]
fn reference_scenario_matches_the_hand_computed_totals() -> TestResult {
    let catalog = Catalog::from_yaml(CATALOG_FIXTURE_YAML)?;
    let engine = engine()?;

    let vehicle = catalog.find("mk2").ok_or("mk2 missing from catalog")?;
    assert_eq!(vehicle.daily_rate(), Rupiah::new(700_000));

    let breakdown = engine.quote(vehicle.daily_rate(), 10, Rupiah::ZERO, "HEMAT5")?;

    assert_eq!(breakdown.subtotal, Rupiah::new(7_000_000));
    assert_eq!(breakdown.tax, Rupiah::new(700_000));
    assert_eq!(breakdown.total_before_discount, Rupiah::new(7_700_000));
    assert_eq!(breakdown.duration_discount, Rupiah::new(385_000));
    assert_eq!(
        breakdown.total_after_duration_discount,
        Rupiah::new(7_315_000)
    );
    assert_eq!(breakdown.voucher_discount, Rupiah::new(365_750));
    assert_eq!(breakdown.grand_total, Rupiah::new(6_949_250));

    Ok(())
}

#[test]
fn duration_discount_is_a_non_decreasing_step_function() -> TestResult {
    let engine = engine()?;
    let rate = Rupiah::new(1_000_000);

    let rate_for = |days: u32| -> Result<Decimal, testresult::TestError> {
        Ok(engine.quote(rate, days, Rupiah::ZERO, "")?.duration_discount_rate)
    };

    assert_eq!(rate_for(6)?, Decimal::ZERO);
    assert_eq!(rate_for(7)?, "0.05".parse::<Decimal>()?);
    assert_eq!(rate_for(13)?, "0.05".parse::<Decimal>()?);
    assert_eq!(rate_for(14)?, "0.10".parse::<Decimal>()?);

    let mut previous = Decimal::ZERO;
    for days in 1..=30 {
        let current = rate_for(days)?;
        assert!(
            current >= previous,
            "discount rate decreased between {} and {} days",
            days - 1,
            days
        );
        previous = current;
    }

    Ok(())
}

#[test]
fn both_shipped_vouchers_resolve_and_unknown_codes_do_not() -> TestResult {
    let engine = engine()?;

    let merdeka = engine.quote(Rupiah::new(1_000_000), 1, Rupiah::ZERO, "merdeka17")?;
    assert_eq!(
        merdeka.voucher,
        VoucherOutcome::Applied {
            code: "MERDEKA17".to_string()
        }
    );
    // subtotal 1.000.000, tax 100.000, no duration tier, voucher 17% of
    // 1.100.000 = 187.000.
    assert_eq!(merdeka.voucher_discount, Rupiah::new(187_000));
    assert_eq!(merdeka.grand_total, Rupiah::new(913_000));

    let unknown = engine.quote(Rupiah::new(1_000_000), 1, Rupiah::ZERO, "DISKON99")?;
    assert_eq!(
        unknown.voucher,
        VoucherOutcome::Rejected {
            code: "DISKON99".to_string()
        }
    );
    assert_eq!(unknown.grand_total, Rupiah::new(1_100_000));

    Ok(())
}

#[test]
fn driver_fee_compounds_through_every_downstream_step() -> TestResult {
    let engine = engine()?;

    // G-Class for 14 days with a driver:
    // subtotal = 14 × 5.000.000 + 14 × 250.000 = 73.500.000
    // tax      = 7.350.000, before = 80.850.000
    // duration = 10% -> 8.085.000, after = 72.765.000
    let breakdown = engine.quote(Rupiah::new(5_000_000), 14, Rupiah::new(250_000), "")?;

    assert_eq!(breakdown.driver_total, Rupiah::new(3_500_000));
    assert_eq!(breakdown.subtotal, Rupiah::new(73_500_000));
    assert_eq!(breakdown.tax, Rupiah::new(7_350_000));
    assert_eq!(breakdown.duration_discount, Rupiah::new(8_085_000));
    assert_eq!(breakdown.grand_total, Rupiah::new(72_765_000));

    Ok(())
}

#[test]
fn every_catalog_rate_survives_a_quote_without_error() -> TestResult {
    let catalog = Catalog::from_yaml(CATALOG_FIXTURE_YAML)?;
    let engine = engine()?;

    for vehicle in catalog.iter() {
        let breakdown = engine.quote(vehicle.daily_rate(), 30, Rupiah::new(250_000), "HEMAT5")?;

        assert!(
            breakdown.grand_total.is_positive(),
            "zero grand total for `{}`",
            vehicle.code()
        );
    }

    Ok(())
}
