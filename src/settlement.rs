//! Payment settlement
//!
//! Cash settlement is a reconciliation loop: as long as the tendered
//! amount does not cover the grand total, the shortfall is reported and
//! another amount is requested. Additional amounts are taken exactly as
//! entered — zero and negative contributions included — so termination
//! rests entirely with the renter. Transfer settlement has no loop.

use crate::currency::Rupiah;
use crate::input::{Console, InputError, Prompter};

/// Payment method chosen at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Label used on the payment menu and the receipt.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Tunai",
            PaymentMethod::Transfer => "Transfer",
        }
    }
}

/// Final payment facts feeding the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRecord {
    /// How the renter paid.
    pub method: PaymentMethod,
    /// Total handed over. Cash only.
    pub tendered: Option<Rupiah>,
    /// Money returned; non-negative once settlement completes. Cash only.
    pub change: Option<Rupiah>,
}

/// Runs the cash reconciliation loop.
///
/// Terminates only when change is non-negative.
///
/// # Errors
///
/// Returns an [`InputError`] if console I/O fails.
pub fn settle_cash<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    grand_total: Rupiah,
    first_tendered: Rupiah,
) -> Result<PaymentRecord, InputError> {
    let mut tendered = first_tendered;
    let mut change = tendered - grand_total;

    while change.is_negative() {
        let shortfall = change.abs();

        tracing::debug!(
            tendered = tendered.amount(),
            shortfall = shortfall.amount(),
            "cash shortfall, requesting more"
        );

        prompter.say(&format!("Uang tidak cukup! Masih kurang Rp{shortfall}"))?;

        let additional = prompter.read_i64(
            &format!("Masukkan uang tambahan sebesar Rp{shortfall}: "),
            None,
        )?;

        tendered += Rupiah::new(additional);
        change = tendered - grand_total;
    }

    Ok(PaymentRecord {
        method: PaymentMethod::Cash,
        tendered: Some(tendered),
        change: Some(change),
    })
}

/// Emits the static transfer instructions. Always succeeds; tendered and
/// change carry no meaning for a transfer.
///
/// # Errors
///
/// Returns an [`InputError`] if console I/O fails.
pub fn settle_transfer<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    grand_total: Rupiah,
) -> Result<PaymentRecord, InputError> {
    prompter.say("Metode pembayaran transfer")?;
    prompter.say("Silakan transfer ke rekening berikut:")?;
    prompter.say("Bank ABC - 123456789 a.n Roda Rent")?;
    prompter.say(&format!("Total yang harus ditransfer: Rp{grand_total}"))?;

    Ok(PaymentRecord {
        method: PaymentMethod::Transfer,
        tendered: None,
        change: None,
    })
}
