//! Renter profile
//!
//! Contact data is free-form; only the guarantee type is a closed choice.

/// Identity document pledged against the rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuaranteeType {
    /// KTP — the national identity card.
    NationalId,
    /// Passport.
    Passport,
    /// SIM — the driving license.
    DriverLicense,
}

impl GuaranteeType {
    /// Menu digits shown on the guarantee form, in display order.
    pub const MENU: [&'static str; 3] = ["1", "2", "3"];

    /// Maps a guarantee menu digit to its type.
    #[must_use]
    pub fn from_menu_digit(digit: &str) -> Option<Self> {
        match digit {
            "1" => Some(GuaranteeType::NationalId),
            "2" => Some(GuaranteeType::Passport),
            "3" => Some(GuaranteeType::DriverLicense),
            _ => None,
        }
    }

    /// Label used on forms and receipts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            GuaranteeType::NationalId => "KTP",
            GuaranteeType::Passport => "Pasport",
            GuaranteeType::DriverLicense => "SIM",
        }
    }

    /// Prompt for the matching document number.
    #[must_use]
    pub const fn number_prompt(self) -> &'static str {
        match self {
            GuaranteeType::NationalId => "Masukan NIK anda : ",
            GuaranteeType::Passport => "Masukan Nomor Pasport anda : ",
            GuaranteeType::DriverLicense => "Masukan Nomor SIM anda : ",
        }
    }
}

/// Renter contact and guarantee data collected by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenterProfile {
    /// Full name, free-form.
    pub name: String,
    /// Address, free-form.
    pub address: String,
    /// Phone number, free-form.
    pub phone: String,
    /// Gender, free-form.
    pub gender: String,
    /// Pledged identity document type.
    pub guarantee: GuaranteeType,
    /// Number of the pledged document, free-form.
    pub guarantee_number: String,
}
