//! Pricing engine
//!
//! Turns (daily rate, duration, driver fee, voucher code) into a fully
//! itemized [`PriceBreakdown`]. The pipeline is pure and order-sensitive:
//! tax is charged on the subtotal, the duration discount on the taxed
//! total, and the voucher discount on whatever remains after the duration
//! discount. Every monetary step floors to whole rupiah.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::currency::{CurrencyError, Rupiah};

/// Errors that can occur while computing a quote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Wrapped rupiah rate arithmetic error.
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// Errors raised while loading the tariff configuration.
#[derive(Debug, Error)]
pub enum TariffError {
    /// The YAML document could not be parsed.
    #[error("failed to parse tariff configuration")]
    Parse(#[from] serde_norway::Error),
}

/// One duration-discount tier: rentals of at least `min_days` days earn
/// `rate` off the taxed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DurationTier {
    min_days: u32,
    rate: Decimal,
}

impl DurationTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(min_days: u32, rate: Decimal) -> Self {
        Self { min_days, rate }
    }

    /// Minimum rental length that qualifies for this tier, inclusive.
    #[must_use]
    pub const fn min_days(&self) -> u32 {
        self.min_days
    }

    /// Fractional discount rate (e.g. `0.10`).
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Tariff data injected into the engine: tax rate, driver rate, duration
/// tiers and the voucher table. New vouchers and tiers are configuration,
/// not code changes.
#[derive(Debug, Clone, Deserialize)]
pub struct Tariff {
    tax_rate: Decimal,
    driver_daily_rate: Rupiah,
    #[serde(default)]
    duration_tiers: Vec<DurationTier>,
    #[serde(default)]
    vouchers: FxHashMap<String, Decimal>,
}

impl Tariff {
    /// Parses a tariff from its YAML source.
    ///
    /// Tiers are reordered so that the longest qualifying duration wins the
    /// lookup regardless of declaration order.
    ///
    /// # Errors
    ///
    /// Returns a [`TariffError`] if the document does not parse.
    pub fn from_yaml(source: &str) -> Result<Self, TariffError> {
        let mut tariff: Tariff = serde_norway::from_str(source)?;
        tariff
            .duration_tiers
            .sort_by(|a, b| b.min_days.cmp(&a.min_days));

        Ok(tariff)
    }

    /// Tax rate charged on the subtotal.
    #[must_use]
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Daily fee for an optional driver.
    #[must_use]
    pub fn driver_daily_rate(&self) -> Rupiah {
        self.driver_daily_rate
    }

    /// Duration tiers, longest-first.
    #[must_use]
    pub fn duration_tiers(&self) -> &[DurationTier] {
        &self.duration_tiers
    }

    /// Duration-discount rate for a rental of `days` days.
    ///
    /// The highest qualifying tier wins; a 20-day rental earns the 14-day
    /// rate, not the 7-day one.
    #[must_use]
    pub fn duration_rate(&self, days: u32) -> Decimal {
        self.duration_tiers
            .iter()
            .find(|tier| days >= tier.min_days)
            .map_or(Decimal::ZERO, DurationTier::rate)
    }

    /// Looks up a canonical (uppercased) voucher code.
    #[must_use]
    pub fn voucher_rate(&self, code: &str) -> Option<Decimal> {
        self.vouchers.get(code).copied()
    }
}

/// Result of the voucher lookup inside a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoucherOutcome {
    /// No code was entered; silently no discount.
    NotEntered,
    /// The code matched the voucher table and earned a discount.
    Applied {
        /// Canonical (uppercased) code.
        code: String,
    },
    /// A non-empty code missed the table; no discount, caller should
    /// print a notice. This is not an error and does not abort the flow.
    Rejected {
        /// Canonical (uppercased) code as entered.
        code: String,
    },
}

/// Fully itemized price for one rental.
///
/// Every field is a deterministic function of the quote inputs; the
/// breakdown is immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Vehicle rate per day.
    pub daily_rate: Rupiah,
    /// Driver rate per day (zero when no driver was requested).
    pub driver_daily_rate: Rupiah,
    /// Rental length in days.
    pub duration_days: u32,
    /// `duration_days * driver_daily_rate`.
    pub driver_total: Rupiah,
    /// Vehicle total plus driver total, before tax.
    pub subtotal: Rupiah,
    /// Tax, floored.
    pub tax: Rupiah,
    /// `subtotal + tax`.
    pub total_before_discount: Rupiah,
    /// Fractional duration-discount rate applied.
    pub duration_discount_rate: Decimal,
    /// Duration discount amount, floored.
    pub duration_discount: Rupiah,
    /// Running total after the duration discount.
    pub total_after_duration_discount: Rupiah,
    /// What happened to the entered voucher code.
    pub voucher: VoucherOutcome,
    /// Voucher discount amount, floored, computed off the post-duration
    /// total — never off the pre-discount total.
    pub voucher_discount: Rupiah,
    /// Final payable amount.
    pub grand_total: Rupiah,
}

/// The deterministic pricing engine. Holds only injected tariff data.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    tariff: Tariff,
}

impl PricingEngine {
    /// Creates an engine over the given tariff.
    #[must_use]
    pub fn new(tariff: Tariff) -> Self {
        Self { tariff }
    }

    /// The injected tariff data.
    #[must_use]
    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Computes the itemized quote.
    ///
    /// `duration_days = 0` is not guarded here — the caller enforces
    /// positivity — and produces an all-zero breakdown.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a rate application overflows. For any
    /// realistic tariff and duration this cannot happen.
    pub fn quote(
        &self,
        daily_rate: Rupiah,
        duration_days: u32,
        driver_daily_rate: Rupiah,
        voucher_code: &str,
    ) -> Result<PriceBreakdown, PricingError> {
        let days = i64::from(duration_days);

        let driver_total = driver_daily_rate * days;
        let subtotal = daily_rate * days + driver_total;
        let tax = subtotal.apply_rate(self.tariff.tax_rate)?;
        let total_before_discount = subtotal + tax;

        let duration_discount_rate = self.tariff.duration_rate(duration_days);
        let duration_discount = total_before_discount.apply_rate(duration_discount_rate)?;
        let total_after_duration_discount = total_before_discount - duration_discount;

        let trimmed = voucher_code.trim();
        let (voucher, voucher_rate) = if trimmed.is_empty() {
            (VoucherOutcome::NotEntered, Decimal::ZERO)
        } else {
            let canonical = trimmed.to_uppercase();

            match self.tariff.voucher_rate(&canonical) {
                Some(rate) => (VoucherOutcome::Applied { code: canonical }, rate),
                None => (VoucherOutcome::Rejected { code: canonical }, Decimal::ZERO),
            }
        };

        let voucher_discount = total_after_duration_discount.apply_rate(voucher_rate)?;
        let grand_total = total_after_duration_discount - voucher_discount;

        tracing::debug!(
            duration_days,
            subtotal = subtotal.amount(),
            grand_total = grand_total.amount(),
            ?voucher,
            "computed quote"
        );

        Ok(PriceBreakdown {
            daily_rate,
            driver_daily_rate,
            duration_days,
            driver_total,
            subtotal,
            tax,
            total_before_discount,
            duration_discount_rate,
            duration_discount,
            total_after_duration_discount,
            voucher,
            voucher_discount,
            grand_total,
        })
    }
}
