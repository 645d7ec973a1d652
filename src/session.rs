//! Interactive rental session
//!
//! One linear flow from catalog table to receipt. All collaborators —
//! catalog, pricing engine, assistant, console and the receipt path — are
//! injected at construction, so whole sessions run under test against a
//! scripted console and a fake assistant.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::assistant::{Assistant, AssistantInterceptor};
use crate::catalog::{Catalog, VehicleListing};
use crate::currency::Rupiah;
use crate::input::{Console, InputError, Prompter};
use crate::pricing::{PriceBreakdown, PricingEngine, PricingError, VoucherOutcome};
use crate::profile::{GuaranteeType, RenterProfile};
use crate::receipt::{Receipt, ReceiptError};
use crate::settlement::{self, PaymentMethod, PaymentRecord};

/// Errors that can abort a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Console I/O failed or the input source ended.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The pricing pipeline overflowed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The receipt could not be rendered or saved.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Vehicle facts and renter choices gathered by the input loop.
#[derive(Debug, Clone)]
pub struct RentalRequest<'a> {
    /// The chosen listing.
    pub vehicle: &'a VehicleListing,
    /// Chosen color; always one of the listing's colors.
    pub color: String,
    /// Rental length in days, at least one.
    pub duration_days: u32,
    /// Whether a driver was requested.
    pub driver_requested: bool,
}

/// How a session ended.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// Settlement completed and the receipt artifact was written.
    Completed {
        /// The itemized quote the renter paid.
        breakdown: PriceBreakdown,
        /// Final payment facts.
        payment: PaymentRecord,
    },

    /// The renter walked away: unknown vehicle code or declined
    /// confirmation. Normal, voluntary termination; no receipt is written.
    Declined,
}

/// A single interactive rental session over injected collaborators.
pub struct RentalSession<'a, C: Console> {
    catalog: &'a Catalog,
    engine: &'a PricingEngine,
    assistant: &'a dyn Assistant,
    context: &'a str,
    console: &'a mut C,
    receipt_path: &'a Path,
}

impl<C: Console> fmt::Debug for RentalSession<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentalSession")
            .field("receipt_path", &self.receipt_path)
            .finish_non_exhaustive()
    }
}

impl<'a, C: Console> RentalSession<'a, C> {
    /// Wires a session over its collaborators.
    pub fn new(
        catalog: &'a Catalog,
        engine: &'a PricingEngine,
        assistant: &'a dyn Assistant,
        context: &'a str,
        console: &'a mut C,
        receipt_path: &'a Path,
    ) -> Self {
        Self {
            catalog,
            engine,
            assistant,
            context,
            console,
            receipt_path,
        }
    }

    /// Runs the session to completion or voluntary termination.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if console I/O fails, the pricing
    /// pipeline overflows, or the receipt cannot be written.
    pub fn run(self) -> Result<SessionOutcome, SessionError> {
        let interceptor = AssistantInterceptor::new(self.assistant, self.context);
        let mut prompter = Prompter::new(self.console, vec![Box::new(interceptor)]);

        show_opening(&mut prompter, self.catalog)?;

        let Some(vehicle) = read_vehicle(&mut prompter, self.catalog)? else {
            return Ok(SessionOutcome::Declined);
        };

        let color = read_color(&mut prompter, vehicle)?;

        if !confirm_rental(&mut prompter, vehicle, &color)? {
            tracing::info!(code = vehicle.code(), "rental declined at confirmation");

            return Ok(SessionOutcome::Declined);
        }

        let driver_requested = offer_driver(&mut prompter, self.engine)?;
        let duration_days = prompter.read_days("Masukan jumlah hari sewa kendaraan : ")?;

        let request = RentalRequest {
            vehicle,
            color,
            duration_days,
            driver_requested,
        };

        let profile = read_profile(&mut prompter)?;
        let voucher_code = prompter.read("Masukkan kode voucher (atau kosong jika tidak ada): ")?;

        let driver_daily_rate = if request.driver_requested {
            self.engine.tariff().driver_daily_rate()
        } else {
            Rupiah::ZERO
        };

        let breakdown = self.engine.quote(
            request.vehicle.daily_rate(),
            request.duration_days,
            driver_daily_rate,
            &voucher_code,
        )?;

        announce_voucher(&mut prompter, &breakdown)?;
        show_bill(&mut prompter, &request, &profile, &breakdown)?;

        let payment = settle(&mut prompter, &breakdown)?;

        let receipt = Receipt::new(
            &profile,
            request.vehicle.name(),
            &request.color,
            &breakdown,
            payment,
            self.engine.tariff().tax_rate(),
        );

        prompter.say("")?;
        prompter.say(receipt.render()?.trim_end())?;
        receipt.save(self.receipt_path)?;
        prompter.say(&format!(
            "Struk berhasil disimpan ke file: {}",
            self.receipt_path.display()
        ))?;

        if payment.method == PaymentMethod::Transfer {
            prompter.say(&"=".repeat(120))?;
            prompter.say("                     Terima kasih atas penyewaan Anda!")?;
            prompter.say(&"=".repeat(120))?;
        }

        tracing::info!(
            code = request.vehicle.code(),
            grand_total = breakdown.grand_total.amount(),
            method = payment.method.label(),
            "session completed"
        );

        Ok(SessionOutcome::Completed { breakdown, payment })
    }
}

fn show_opening<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    catalog: &Catalog,
) -> Result<(), InputError> {
    let rule = "=".repeat(120);

    prompter.say(&rule)?;
    prompter.say(&format!("{:^120}", "Roda Rent"))?;
    prompter.say(&rule)?;
    prompter.say(&catalog.price_table())?;
    prompter.say("Masukan jenis kendaraan yang akan di sewa dengan kode: ")?;
    prompter.say("mb = Mobil, mk = Motor, s = Sepeda")?;
    prompter.say("Contoh: mb1 untuk sewa mobil G-Class (nomor 1)")?;
    prompter.say(&rule)?;
    prompter.say("Ragu? Tanya ai masyud dengan ketik 'halo mas' di input manapun!")?;

    Ok(())
}

/// Reads the vehicle code. An unknown code is a voluntary exit, not an
/// error: the message is printed and `None` returned.
fn read_vehicle<'a, C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    catalog: &'a Catalog,
) -> Result<Option<&'a VehicleListing>, InputError> {
    let raw = prompter.read("Masukan jenis kendaraan yang akan di sewa : ")?;
    let code: String = raw.to_lowercase().split_whitespace().collect();

    match catalog.find(&code) {
        Some(vehicle) => {
            prompter.say(&format!(
                "Anda memilih {} dengan harga Rp {} per hari.",
                vehicle.name(),
                vehicle.daily_rate()
            ))?;

            Ok(Some(vehicle))
        }
        None => {
            tracing::info!(%code, "unknown vehicle code, ending session");
            prompter.say("Kode kendaraan tidak valid!")?;

            Ok(None)
        }
    }
}

fn read_color<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    vehicle: &VehicleListing,
) -> Result<String, InputError> {
    let colors: Vec<&str> = vehicle.colors().iter().map(String::as_str).collect();

    prompter.say(&format!("Pilihan warna tersedia: {}", colors.join(", ")))?;

    let color = prompter.read_choice("Pilih warna kendaraan: ", &colors)?;

    prompter.say(&format!(
        "Anda memilih warna {} untuk kendaraan {}.",
        color,
        vehicle.name()
    ))?;

    Ok(color)
}

fn confirm_rental<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    vehicle: &VehicleListing,
    color: &str,
) -> Result<bool, InputError> {
    let rule = "=".repeat(40);

    prompter.say("")?;
    prompter.say(&rule)?;
    prompter.say("Konfirmasi sewa kendaraan")?;
    prompter.say(&rule)?;
    prompter.say(&format!(
        "Jenis kendaraan yang akan di sewa : {}",
        vehicle.name()
    ))?;
    prompter.say(&format!("Warna                             : {color}"))?;
    prompter.say(&format!(
        "Harga sewa per hari : Rp {}",
        vehicle.daily_rate()
    ))?;

    let answer = prompter.read_choice("Yakin akan sewa kendaraan ini? (Y/T) : ", &["Y", "T"])?;

    Ok(answer == "Y")
}

fn offer_driver<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    engine: &PricingEngine,
) -> Result<bool, InputError> {
    let rule = "=".repeat(40);

    prompter.say("")?;
    prompter.say(&rule)?;
    prompter.say("Sopir")?;
    prompter.say(&rule)?;
    prompter.say(&format!(
        "Harga sopir per hari : Rp {}",
        engine.tariff().driver_daily_rate()
    ))?;

    let answer = prompter.read_choice("Apakah anda ingin sewa sopir? (Y/T) : ", &["Y", "T"])?;

    Ok(answer == "Y")
}

fn read_profile<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
) -> Result<RenterProfile, InputError> {
    let rule = "=".repeat(20);

    prompter.say("")?;
    prompter.say(&rule)?;
    prompter.say("Formulir ketentuan penyewaan")?;
    prompter.say(&rule)?;

    let name = prompter.read("Masukan nama anda        : ")?;
    let address = prompter.read("Masukan alamat anda      : ")?;
    let phone = prompter.read("Masukan nomor telepon    : ")?;
    let gender = prompter.read("Masukan jenis kelamin    : ")?;

    prompter.say("")?;
    prompter.say(&rule)?;
    prompter.say("Jenis Jaminan")?;
    prompter.say(&rule)?;
    prompter.say("1. KTP")?;
    prompter.say("2. Pasport")?;
    prompter.say("3. SIM")?;

    let digit = prompter.read_choice("Masukan jenis jaminan (1/2/3) : ", &GuaranteeType::MENU)?;

    let Some(guarantee) = GuaranteeType::from_menu_digit(&digit) else {
        unreachable!("the choice set only admits valid menu digits")
    };

    let guarantee_number = prompter.read(guarantee.number_prompt())?;

    Ok(RenterProfile {
        name,
        address,
        phone,
        gender,
        guarantee,
        guarantee_number,
    })
}

fn announce_voucher<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    breakdown: &PriceBreakdown,
) -> Result<(), InputError> {
    match &breakdown.voucher {
        VoucherOutcome::Applied { code } => prompter.say(&format!(
            "Voucher {code} berhasil! Diskon tambahan Rp{}",
            breakdown.voucher_discount
        )),
        VoucherOutcome::Rejected { .. } => prompter.say("Kode voucher tidak valid."),
        VoucherOutcome::NotEntered => Ok(()),
    }
}

fn show_bill<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    request: &RentalRequest<'_>,
    profile: &RenterProfile,
    breakdown: &PriceBreakdown,
) -> Result<(), InputError> {
    let rule = "=".repeat(120);

    prompter.say("")?;
    prompter.say(&rule)?;
    prompter.say(&format!("{:^120}", "Roda Rent"))?;
    prompter.say(&rule)?;
    prompter.say(&format!("{:^120}", "Bukti Penyewaan"))?;
    prompter.say(&"-".repeat(120))?;
    prompter.say(&format!("Nama                         : {}", profile.name))?;
    prompter.say(&format!("Alamat                       : {}", profile.address))?;
    prompter.say(&format!("Telepon                      : {}", profile.phone))?;
    prompter.say(&format!("Jenis Kelamin                : {}", profile.gender))?;
    prompter.say(&format!(
        "Jenis Kendaraan              : {}",
        request.vehicle.name()
    ))?;
    prompter.say(&format!("Warna                        : {}", request.color))?;
    prompter.say(&format!(
        "Jumlah Hari Sewa             : {}",
        request.duration_days
    ))?;
    prompter.say(&format!(
        "Harga Sewa                   : Rp {}",
        breakdown.daily_rate
    ))?;
    prompter.say(&format!(
        "Harga Sopir ({} x {}) : Rp {}",
        breakdown.duration_days, breakdown.driver_daily_rate, breakdown.driver_total
    ))?;
    prompter.say(&format!(
        "Jumlah yang harus dibayar    : Rp {}",
        breakdown.grand_total
    ))?;

    Ok(())
}

fn settle<C: Console>(
    prompter: &mut Prompter<'_, '_, C>,
    breakdown: &PriceBreakdown,
) -> Result<PaymentRecord, SessionError> {
    let rule = "=".repeat(20);

    prompter.say("")?;
    prompter.say(&rule)?;
    prompter.say("Metode Pembayaran")?;
    prompter.say(&rule)?;
    prompter.say("1. Tunai")?;
    prompter.say("2. Transfer")?;

    let method = prompter.read_choice("Masukan metode pembayaran (1/2) : ", &["1", "2"])?;

    if method == "1" {
        let first =
            prompter.read_i64("Silakan isi jumlah uang yang akan dibayar : Rp", None)?;

        Ok(settlement::settle_cash(
            prompter,
            breakdown.grand_total,
            Rupiah::new(first),
        )?)
    } else {
        Ok(settlement::settle_transfer(prompter, breakdown.grand_total)?)
    }
}
