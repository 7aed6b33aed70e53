use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::CatalogConfig;

/// Display name returned for CPT codes absent from the procedure directory
pub const UNKNOWN_PROCEDURE: &str = "Unknown Procedure";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// A healthcare provider entry. Static for the lifetime of a catalog load;
/// never mutated by the query pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Provider {
    pub hospital_name: String,
    pub doctor_name: String,
    pub hospital_address: String,
    pub zip_code: String,
    pub hospital_rating: f32,
    pub doctor_rating: f32,
    pub distance_miles: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// A complementary service eligible to be offered alongside a procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddonOffer {
    pub code: String,
    pub name: String,
    /// Co-occurrence frequency on a 0-10 scale
    pub frequency: u8,
}

/// Immutable lookup tables for procedures, providers and prices.
///
/// The struct doubles as the on-disk TOML schema, so a catalog file is just
/// this shape serialized.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    /// CPT code -> human-readable procedure name
    #[serde(default)]
    pub procedures: HashMap<String, String>,
    /// Doctor name -> offered CPT codes. Informational only; not consulted
    /// by filtering or pricing.
    #[serde(default)]
    pub doctor_procedures: HashMap<String, Vec<String>>,
    /// CPT code -> (related CPT code -> co-occurrence frequency 0-10)
    #[serde(default)]
    pub complementary: HashMap<String, HashMap<String, u8>>,
    /// Hospital name -> (CPT code -> price in whole USD)
    #[serde(default)]
    pub prices: HashMap<String, HashMap<String, u64>>,
    #[serde(default)]
    pub providers: Vec<Provider>,
}

impl Catalog {
    /// Built-in demo catalog. Stands in for real transparency-in-coverage
    /// data sources; all entries are fictional.
    pub fn builtin() -> Self {
        let procedures = HashMap::from([
            ("99213".to_string(), "Office or other outpatient visit".to_string()),
            ("99214".to_string(), "Office or other outpatient visit, established patient".to_string()),
            ("99215".to_string(), "Office or other outpatient visit, new patient".to_string()),
            ("45378".to_string(), "Colonoscopy".to_string()),
            ("00810".to_string(), "Anesthesia for lower intestinal endoscopic procedures".to_string()),
            ("70450".to_string(), "CT Head/Brain".to_string()),
            ("73721".to_string(), "MRI Lower Extremity".to_string()),
        ]);

        let doctor_procedures = HashMap::from([
            ("Dr. Smith".to_string(), vec!["99213".to_string(), "70450".to_string()]),
            ("Dr. Johnson".to_string(), vec!["99214".to_string(), "73721".to_string()]),
            ("Dr. Lee".to_string(), vec!["99215".to_string(), "45378".to_string(), "00810".to_string()]),
        ]);

        let complementary = HashMap::from([
            ("45378".to_string(), HashMap::from([("00810".to_string(), 10)])),
            ("99215".to_string(), HashMap::from([("70450".to_string(), 7)])),
            ("73721".to_string(), HashMap::from([("70450".to_string(), 8)])),
        ]);

        let prices = HashMap::from([
            (
                "General Hospital".to_string(),
                HashMap::from([
                    ("99213".to_string(), 200),
                    ("70450".to_string(), 500),
                    ("99214".to_string(), 220),
                    ("73721".to_string(), 700),
                    ("99215".to_string(), 250),
                    ("45378".to_string(), 800),
                    ("00810".to_string(), 300),
                ]),
            ),
            (
                "City Clinic".to_string(),
                HashMap::from([
                    ("99213".to_string(), 180),
                    ("70450".to_string(), 480),
                    ("99214".to_string(), 210),
                    ("73721".to_string(), 680),
                    ("99215".to_string(), 240),
                    ("45378".to_string(), 780),
                    ("00810".to_string(), 290),
                ]),
            ),
            (
                "Health Center".to_string(),
                HashMap::from([
                    ("99213".to_string(), 190),
                    ("70450".to_string(), 490),
                    ("99214".to_string(), 215),
                    ("73721".to_string(), 690),
                    ("99215".to_string(), 245),
                    ("45378".to_string(), 790),
                    ("00810".to_string(), 295),
                ]),
            ),
        ]);

        let providers = vec![
            Provider {
                hospital_name: "General Hospital".to_string(),
                doctor_name: "Dr. Smith".to_string(),
                hospital_address: "123 Main St".to_string(),
                zip_code: "12345".to_string(),
                hospital_rating: 4.5,
                doctor_rating: 4.7,
                distance_miles: 5.0,
                latitude: 40.7128,
                longitude: -74.0060,
            },
            Provider {
                hospital_name: "City Clinic".to_string(),
                doctor_name: "Dr. Johnson".to_string(),
                hospital_address: "456 Elm St".to_string(),
                zip_code: "67890".to_string(),
                hospital_rating: 4.2,
                doctor_rating: 4.5,
                distance_miles: 10.0,
                latitude: 34.0522,
                longitude: -118.2437,
            },
            Provider {
                hospital_name: "Health Center".to_string(),
                doctor_name: "Dr. Lee".to_string(),
                hospital_address: "789 Oak St".to_string(),
                zip_code: "54321".to_string(),
                hospital_rating: 4.0,
                doctor_rating: 4.3,
                distance_miles: 15.0,
                latitude: 41.8781,
                longitude: -87.6298,
            },
        ];

        Self {
            procedures,
            doctor_procedures,
            complementary,
            prices,
            providers,
        }
    }

    /// Load a catalog from a TOML file and validate it
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = toml::from_str(&contents)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the catalog named by the configuration: a TOML file when a path
    /// is set, the built-in demo catalog otherwise.
    pub fn load(cfg: &CatalogConfig) -> Result<Self, CatalogError> {
        match &cfg.path {
            Some(path) => {
                info!("Loading catalog from {:?}", path);
                Self::from_toml_file(path)
            }
            None => {
                info!("Using built-in demo catalog");
                let catalog = Self::builtin();
                catalog.validate()?;
                Ok(catalog)
            }
        }
    }

    /// Validate catalog contents.
    ///
    /// Range violations are rejected. References to CPT codes missing from
    /// the procedure directory are allowed (lookups degrade to sentinel/zero)
    /// but logged, since they usually indicate a truncated directory.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for provider in &self.providers {
            if provider.hospital_name.is_empty() {
                return Err(CatalogError::Invalid(
                    "Provider with empty hospital name".to_string(),
                ));
            }
            if !(0.0..=5.0).contains(&provider.hospital_rating) {
                return Err(CatalogError::Invalid(format!(
                    "Hospital rating for '{}' must be between 0 and 5, got {}",
                    provider.hospital_name, provider.hospital_rating
                )));
            }
            if !(0.0..=5.0).contains(&provider.doctor_rating) {
                return Err(CatalogError::Invalid(format!(
                    "Doctor rating for '{}' must be between 0 and 5, got {}",
                    provider.doctor_name, provider.doctor_rating
                )));
            }
            if provider.distance_miles < 0.0 || !provider.distance_miles.is_finite() {
                return Err(CatalogError::Invalid(format!(
                    "Distance for '{}' must be a non-negative number, got {}",
                    provider.hospital_name, provider.distance_miles
                )));
            }
        }

        for (code, related) in &self.complementary {
            for (related_code, frequency) in related {
                if *frequency > 10 {
                    return Err(CatalogError::Invalid(format!(
                        "Complementary frequency for {} -> {} must be between 0 and 10, got {}",
                        code, related_code, frequency
                    )));
                }
                if !self.procedures.contains_key(related_code) {
                    warn!(
                        "Complementary service {} for {} is not in the procedure directory",
                        related_code, code
                    );
                }
            }
        }

        for (hospital, price_list) in &self.prices {
            for code in price_list.keys() {
                if !self.procedures.contains_key(code) {
                    warn!(
                        "Price list for '{}' references unknown procedure {}",
                        hospital, code
                    );
                }
            }
        }

        Ok(())
    }

    /// Resolve a CPT code to its display name, or the sentinel when absent.
    /// Total function; unknown codes are never an error.
    pub fn procedure_name_for(&self, code: &str) -> &str {
        self.procedures
            .get(code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PROCEDURE)
    }

    /// All complementary services recorded for a procedure, with their
    /// co-occurrence frequencies. Empty for codes with no complementary set.
    pub fn complementary_offers_for(&self, code: &str) -> impl Iterator<Item = (&str, u8)> {
        self.complementary
            .get(code)
            .into_iter()
            .flatten()
            .map(|(related, frequency)| (related.as_str(), *frequency))
    }

    /// Complementary services offerable as add-ons: those with co-occurrence
    /// frequency strictly greater than `frequency_threshold`. Sorted by code
    /// so the offer list is deterministic.
    pub fn eligible_addons_for(&self, code: &str, frequency_threshold: u8) -> Vec<AddonOffer> {
        let mut offers: Vec<AddonOffer> = self
            .complementary_offers_for(code)
            .filter(|(_, frequency)| *frequency > frequency_threshold)
            .map(|(related, frequency)| AddonOffer {
                code: related.to_string(),
                name: self.procedure_name_for(related).to_string(),
                frequency,
            })
            .collect();

        offers.sort_by(|a, b| a.code.cmp(&b.code));
        offers
    }

    /// Listed price for a procedure at a hospital. Missing hospitals or
    /// unlisted procedures price at zero rather than failing.
    pub fn price_for(&self, hospital: &str, code: &str) -> u64 {
        self.prices
            .get(hospital)
            .and_then(|price_list| price_list.get(code))
            .copied()
            .unwrap_or(0)
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }
}
