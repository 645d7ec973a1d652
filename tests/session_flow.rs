//! End-to-end session flows over a scripted console.
//!
//! Each test drives the whole interactive loop — catalog table, vehicle
//! code, color, confirmation, driver offer, duration, renter form,
//! guarantee, voucher, payment — from a fixed transcript, with a fake
//! assistant standing in for the AI collaborator.

use std::path::PathBuf;

use testresult::TestResult;

use roda::assistant::{Assistant, AssistantError};
use roda::catalog::Catalog;
use roda::currency::Rupiah;
use roda::input::ScriptedConsole;
use roda::pricing::{PricingEngine, Tariff};
use roda::session::{RentalSession, SessionOutcome};
use roda::settlement::PaymentMethod;

const CATALOG_FIXTURE_YAML: &str = include_str!("../fixtures/catalog.yml");
const TARIFF_FIXTURE_YAML: &str = include_str!("../fixtures/tariff.yml");

/// Assistant that replies with a fixed line, recording nothing.
struct CannedAssistant(&'static str);

impl Assistant for CannedAssistant {
    fn answer(&self, _context: &str, _question: &str) -> Result<String, AssistantError> {
        Ok(self.0.to_string())
    }
}

struct Fixture {
    catalog: Catalog,
    engine: PricingEngine,
    receipt_path: PathBuf,
    _dir: tempfile::TempDir,
}

fn fixture() -> Result<Fixture, testresult::TestError> {
    let dir = tempfile::tempdir()?;

    Ok(Fixture {
        catalog: Catalog::from_yaml(CATALOG_FIXTURE_YAML)?,
        engine: PricingEngine::new(Tariff::from_yaml(TARIFF_FIXTURE_YAML)?),
        receipt_path: dir.path().join("struk_penyewaan.txt"),
        _dir: dir,
    })
}

#[test]
fn cash_session_completes_and_writes_the_receipt() -> TestResult {
    let fx = fixture()?;

    let mut console = ScriptedConsole::with_answers([
        "mk2",                       // vehicle code
        "biru",                      // color, case-insensitive
        "y",                         // confirm
        "T",                         // no driver
        "10",                        // days
        "Budi Santoso",              // name
        "Jalan Kenanga 5, Jakarta",  // address
        "081234567890",              // phone
        "Pria",                      // gender
        "1",                         // guarantee: KTP
        "3204012345678901",          // NIK
        "HEMAT5",                    // voucher
        "1",                         // payment: cash
        "7000000",                   // first tender
    ]);

    let session = RentalSession::new(
        &fx.catalog,
        &fx.engine,
        &CannedAssistant("ya"),
        "context",
        &mut console,
        &fx.receipt_path,
    );

    let outcome = session.run()?;

    let SessionOutcome::Completed { breakdown, payment } = outcome else {
        return Err("session should complete".into());
    };

    assert_eq!(breakdown.grand_total, Rupiah::new(6_949_250));
    assert_eq!(payment.method, PaymentMethod::Cash);
    assert_eq!(payment.tendered, Some(Rupiah::new(7_000_000)));
    assert_eq!(payment.change, Some(Rupiah::new(50_750)));

    assert!(console.printed("Voucher HEMAT5 berhasil! Diskon tambahan Rp365.750"));
    assert!(console.printed("Struk berhasil disimpan ke file:"));

    let artifact = std::fs::read_to_string(&fx.receipt_path)?;
    assert!(artifact.contains("Nama             : Budi Santoso"), "missing renter");
    assert!(artifact.contains("Warna            : Biru"), "color must be canonically cased");
    assert!(artifact.contains("Total Bayar      : Rp6.949.250"), "missing grand total");
    assert!(artifact.contains("Kembalian        : Rp50.750"), "missing change");

    Ok(())
}

#[test]
fn cash_shortfall_loops_until_covered() -> TestResult {
    let fx = fixture()?;

    // Sepeda (s2) at Rp 10.000/day for one day: subtotal 10.000, tax
    // 1.000, grand total 11.000. First tender 5.000 leaves a 6.000
    // shortfall, settled by one additional tender.
    let mut console = ScriptedConsole::with_answers([
        "s2", "Biru", "Y", "T", "1", "Sari", "Bogor", "0811", "Wanita", "3", "SIM-123", "",
        "1",    // cash
        "5000", // not enough
        "6000", // covers exactly
    ]);

    let session = RentalSession::new(
        &fx.catalog,
        &fx.engine,
        &CannedAssistant("ya"),
        "context",
        &mut console,
        &fx.receipt_path,
    );

    let outcome = session.run()?;

    let SessionOutcome::Completed { breakdown, payment } = outcome else {
        return Err("session should complete".into());
    };

    assert_eq!(breakdown.grand_total, Rupiah::new(11_000));
    assert_eq!(payment.tendered, Some(Rupiah::new(11_000)));
    assert_eq!(payment.change, Some(Rupiah::ZERO));
    assert!(console.printed("Uang tidak cukup! Masih kurang Rp6.000"));

    Ok(())
}

#[test]
fn transfer_session_emits_instructions_and_the_receipt() -> TestResult {
    let fx = fixture()?;

    let mut console = ScriptedConsole::with_answers([
        "mb1", "Hitam", "Y", "Y", "14", "Dewi", "Bandung", "0812", "Wanita", "2", "C1234567",
        "MERDEKA17",
        "2", // transfer
    ]);

    let session = RentalSession::new(
        &fx.catalog,
        &fx.engine,
        &CannedAssistant("ya"),
        "context",
        &mut console,
        &fx.receipt_path,
    );

    let outcome = session.run()?;

    let SessionOutcome::Completed { breakdown, payment } = outcome else {
        return Err("session should complete".into());
    };

    // G-Class, 14 days, driver, MERDEKA17:
    // subtotal 73.500.000, tax 7.350.000, duration 10% = 8.085.000,
    // after 72.765.000, voucher 17% = 12.370.050, grand 60.394.950.
    assert_eq!(breakdown.grand_total, Rupiah::new(60_394_950));
    assert_eq!(payment.method, PaymentMethod::Transfer);
    assert_eq!(payment.tendered, None);

    assert!(console.printed("Silakan transfer ke rekening berikut:"));
    assert!(console.printed("Total yang harus ditransfer: Rp60.394.950"));
    assert!(console.printed("Terima kasih atas penyewaan Anda!"));

    let artifact = std::fs::read_to_string(&fx.receipt_path)?;
    assert!(artifact.contains("Metode Pembayaran: Transfer"), "missing method");
    assert!(!artifact.contains("Nominal Dibayar"), "transfer has no tendered amount");

    Ok(())
}

#[test]
fn assistant_detour_mid_session_resumes_the_interrupted_prompt() -> TestResult {
    let fx = fixture()?;

    // The sentinel is typed at the color prompt; the chat opens, the user
    // leaves it, and the color prompt is asked again.
    let mut console = ScriptedConsole::with_answers([
        "mk2",
        "halo mas", // trigger, never a color
        "keluar",   // leave the chat
        "Biru",     // the actual color
        "T",        // then decline the confirmation to end quickly
    ]);

    let session = RentalSession::new(
        &fx.catalog,
        &fx.engine,
        &CannedAssistant("Kami buka setiap hari."),
        "context",
        &mut console,
        &fx.receipt_path,
    );

    let outcome = session.run()?;

    assert!(matches!(outcome, SessionOutcome::Declined));
    assert!(console.printed("Masyud: Halo! Mau tanya apa seputar penyewaan?"));
    assert!(console.printed("Anda memilih warna Biru untuk kendaraan Yamaha R6."));
    assert!(!fx.receipt_path.exists(), "declined session must not write a receipt");

    Ok(())
}

#[test]
fn invalid_vehicle_code_terminates_without_a_receipt() -> TestResult {
    let fx = fixture()?;

    let mut console = ScriptedConsole::with_answers(["traktor9"]);

    let session = RentalSession::new(
        &fx.catalog,
        &fx.engine,
        &CannedAssistant("ya"),
        "context",
        &mut console,
        &fx.receipt_path,
    );

    let outcome = session.run()?;

    assert!(matches!(outcome, SessionOutcome::Declined));
    assert!(console.printed("Kode kendaraan tidak valid!"));
    assert!(!fx.receipt_path.exists(), "no receipt may exist after an invalid code");

    Ok(())
}

#[test]
fn malformed_duration_is_reprompted_not_fatal() -> TestResult {
    let fx = fixture()?;

    let mut console = ScriptedConsole::with_answers([
        "s2", "Merah", "Y", "T",
        "sepuluh", // not a number: re-prompt
        "-3",      // below the minimum: re-prompt
        "2",       // accepted
        "Andi", "Depok", "0813", "Pria", "1", "327", "",
        "1", "25000",
    ]);

    let session = RentalSession::new(
        &fx.catalog,
        &fx.engine,
        &CannedAssistant("ya"),
        "context",
        &mut console,
        &fx.receipt_path,
    );

    let outcome = session.run()?;

    let SessionOutcome::Completed { breakdown, payment } = outcome else {
        return Err("session should complete".into());
    };

    // 2 days × 10.000 = 20.000, tax 2.000, grand 22.000; change 3.000.
    assert_eq!(breakdown.grand_total, Rupiah::new(22_000));
    assert_eq!(payment.change, Some(Rupiah::new(3_000)));
    assert!(console.printed("Masukan harus berupa angka."));

    Ok(())
}
