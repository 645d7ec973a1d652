//! Receipt rendering
//!
//! Consumes only final computed values: the renter profile, the chosen
//! vehicle, the price breakdown and the payment record. The same fixed
//! line-by-line layout is printed to screen and written to the UTF-8
//! artifact file, which is overwritten on every run and only ever written
//! after settlement has completed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::pricing::PriceBreakdown;
use crate::profile::RenterProfile;
use crate::settlement::PaymentRecord;

const RULE_HEAVY: &str = "==================================================";
const RULE_LIGHT: &str = "--------------------------------------------------";

/// Errors raised while emitting the receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The artifact file or output stream could not be written.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Assembled, fully-computed receipt data.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    profile: &'a RenterProfile,
    vehicle_name: &'a str,
    color: &'a str,
    breakdown: &'a PriceBreakdown,
    payment: PaymentRecord,
    tax_rate: Decimal,
}

impl<'a> Receipt<'a> {
    /// Creates a receipt from final computed values.
    #[must_use]
    pub fn new(
        profile: &'a RenterProfile,
        vehicle_name: &'a str,
        color: &'a str,
        breakdown: &'a PriceBreakdown,
        payment: PaymentRecord,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            profile,
            vehicle_name,
            color,
            breakdown,
            payment,
            tax_rate,
        }
    }

    /// Writes the fixed line-by-line layout.
    ///
    /// Discount lines appear only when their amount is non-zero; tendered
    /// and change lines appear only for cash payments.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the writer fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let breakdown = self.breakdown;

        writeln!(out, "{RULE_HEAVY}")?;
        writeln!(out, "                Roda Rent")?;
        writeln!(out, "{RULE_HEAVY}")?;
        writeln!(out, "Bukti Pembayaran")?;
        writeln!(out, "{RULE_LIGHT}")?;
        writeln!(out, "Nama             : {}", self.profile.name)?;
        writeln!(out, "Alamat           : {}", self.profile.address)?;
        writeln!(out, "Jenis Kelamin    : {}", self.profile.gender)?;
        writeln!(out, "No. Telepon      : {}", self.profile.phone)?;
        writeln!(
            out,
            "Jaminan          : {} ({})",
            self.profile.guarantee.label(),
            self.profile.guarantee_number
        )?;
        writeln!(out, "{RULE_LIGHT}")?;
        writeln!(out, "Pesanan Anda:")?;
        writeln!(out, "Jenis Kendaraan  : {}", self.vehicle_name)?;
        writeln!(out, "Warna            : {}", self.color)?;
        writeln!(out, "Jumlah Hari      : {}", breakdown.duration_days)?;
        writeln!(out, "Subtotal         : Rp{}", breakdown.subtotal)?;
        writeln!(
            out,
            "Pajak ({})      : Rp{}",
            percent_label(self.tax_rate),
            breakdown.tax
        )?;

        if breakdown.duration_discount.is_positive() {
            writeln!(out, "Diskon Durasi    : Rp{}", breakdown.duration_discount)?;
        }

        if breakdown.voucher_discount.is_positive() {
            writeln!(out, "Voucher Diskon   : Rp{}", breakdown.voucher_discount)?;
        }

        writeln!(
            out,
            "Harga Sopir ({} x {}) : Rp{}",
            breakdown.duration_days, breakdown.driver_daily_rate, breakdown.driver_total
        )?;
        writeln!(out, "Total Bayar      : Rp{}", breakdown.grand_total)?;
        writeln!(out, "Metode Pembayaran: {}", self.payment.method.label())?;

        if let Some(tendered) = self.payment.tendered {
            writeln!(out, "Nominal Dibayar  : Rp{tendered}")?;
        }

        if let Some(change) = self.payment.change {
            writeln!(out, "Kembalian        : Rp{change}")?;
        }

        writeln!(out, "{RULE_HEAVY}")?;

        Ok(())
    }

    /// Renders the receipt to a string.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if rendering fails.
    pub fn render(&self) -> Result<String, ReceiptError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the artifact file, replacing any previous run's receipt.
    ///
    /// The file is opened, written and released within this call on every
    /// exit path.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), ReceiptError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        self.write_to(&mut writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// Formats a fractional rate as percent points, e.g. `0.10` as `10%`.
fn percent_label(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
