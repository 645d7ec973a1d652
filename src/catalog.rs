//! Vehicle catalog
//!
//! The catalog is static configuration: a YAML document mapping vehicle
//! codes to display name, daily rate, display category and available
//! colors. It is parsed once at startup and read-only afterwards.

use serde::Deserialize;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

use crate::currency::Rupiah;

/// Errors raised while loading the catalog configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The YAML document could not be parsed.
    #[error("failed to parse catalog configuration")]
    Parse(#[from] serde_norway::Error),

    /// Two listings share the same code.
    #[error("vehicle code `{0}` appears more than once")]
    DuplicateCode(String),

    /// A listing declared no colors.
    #[error("vehicle `{0}` declares no colors")]
    EmptyColors(String),

    /// A listing declared a zero or negative daily rate.
    #[error("vehicle `{0}` declares a non-positive daily rate")]
    NonPositiveRate(String),
}

/// Display category grouping listings in the opening price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum VehicleCategory {
    /// Cars.
    Mobil,
    /// Motorcycles.
    Motor,
    /// Bicycles.
    Sepeda,
}

impl VehicleCategory {
    /// Column order of the opening table.
    pub const ALL: [VehicleCategory; 3] = [
        VehicleCategory::Mobil,
        VehicleCategory::Motor,
        VehicleCategory::Sepeda,
    ];

    /// Column header shown in the opening table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            VehicleCategory::Mobil => "Mobil",
            VehicleCategory::Motor => "Motor",
            VehicleCategory::Sepeda => "Sepeda",
        }
    }
}

/// A single rentable vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleListing {
    code: String,
    name: String,
    category: VehicleCategory,
    daily_rate: Rupiah,
    colors: Vec<String>,
}

impl VehicleListing {
    /// Unique lookup code (e.g. `mb1`).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display category.
    #[must_use]
    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    /// Rental rate per day.
    #[must_use]
    pub fn daily_rate(&self) -> Rupiah {
        self.daily_rate
    }

    /// Available colors, in display order. Never empty.
    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    vehicles: Vec<VehicleListing>,
}

/// The full vehicle catalog, loaded once per process.
#[derive(Debug, Clone)]
pub struct Catalog {
    vehicles: Vec<VehicleListing>,
}

impl Catalog {
    /// Parses and validates a catalog from its YAML source.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the document does not parse, a code is
    /// duplicated, a listing has no colors, or a daily rate is not positive.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_norway::from_str(source)?;

        for (idx, listing) in document.vehicles.iter().enumerate() {
            let duplicated = document
                .vehicles
                .iter()
                .skip(idx + 1)
                .any(|other| other.code == listing.code);

            if duplicated {
                return Err(CatalogError::DuplicateCode(listing.code.clone()));
            }

            if listing.colors.is_empty() {
                return Err(CatalogError::EmptyColors(listing.code.clone()));
            }

            if !listing.daily_rate.is_positive() {
                return Err(CatalogError::NonPositiveRate(listing.code.clone()));
            }
        }

        Ok(Catalog {
            vehicles: document.vehicles,
        })
    }

    /// Looks up a listing by its code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&VehicleListing> {
        self.vehicles.iter().find(|listing| listing.code == code)
    }

    /// Number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Returns `true` when the catalog holds no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Iterates over all listings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &VehicleListing> {
        self.vehicles.iter()
    }

    /// Renders the opening three-column price table.
    ///
    /// Listings are grouped by category into columns; each cell shows the
    /// display name and the daily rate.
    #[must_use]
    pub fn price_table(&self) -> String {
        let columns: Vec<Vec<String>> = VehicleCategory::ALL
            .iter()
            .map(|category| {
                self.vehicles
                    .iter()
                    .filter(|listing| listing.category == *category)
                    .map(|listing| {
                        format!("{} - Rp {}/hari", listing.name, listing.daily_rate)
                    })
                    .collect()
            })
            .collect();

        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

        let mut builder = Builder::default();

        let mut header = vec!["No".to_string()];
        header.extend(
            VehicleCategory::ALL
                .iter()
                .map(|category| category.label().to_string()),
        );
        builder.push_record(header);

        for row in 0..rows {
            let mut record = vec![(row + 1).to_string()];

            for column in &columns {
                record.push(column.get(row).cloned().unwrap_or_default());
            }

            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());

        table.to_string()
    }
}
