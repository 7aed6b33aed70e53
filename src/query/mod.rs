pub mod filter;
pub mod pricing;
pub mod rank;

pub use filter::{filter_providers, FilterCriteria};
pub use pricing::{price_provider, BreakdownLine, PricedProvider, MAIN_SERVICE_LABEL};
pub use rank::rank_providers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::AppError;

/// Longest accepted procedure code / free-text procedure input
const MAX_PROCEDURE_CODE_LEN: usize = 64;

/// How the caller wants the ranked results rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Table,
    Map,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Table => "table",
            DisplayMode::Map => "map",
        }
    }
}

/// A single comparison query as received from the UI collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// CPT code (free text; unknown codes resolve to the sentinel name)
    pub procedure_code: String,
    /// Echoed back for display; not consulted by filtering
    #[serde(default)]
    pub zip_code: Option<String>,
    pub radius_miles: u32,
    #[serde(default)]
    pub require_hospital_rating: bool,
    #[serde(default)]
    pub require_doctor_rating: bool,
    /// Selected complementary add-ons; each must be eligible for the procedure
    #[serde(default)]
    pub addon_codes: Vec<String>,
    #[serde(default)]
    pub display: DisplayMode,
}

/// Ranked, cost-annotated results for one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub procedure_code: String,
    pub procedure_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub radius_miles: u32,
    pub addon_codes: Vec<String>,
    pub display: DisplayMode,
    /// External map surface to delegate to, present only for map display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    pub providers: Vec<PricedProvider>,
}

/// Run the full filter -> price -> rank pipeline for one request.
///
/// Stateless: every call recomputes from the catalog, so the output always
/// reflects the current inputs. Catalog absence (unknown codes, unlisted
/// prices) degrades to sentinel/zero; only malformed requests error.
pub fn run_query(
    catalog: &Catalog,
    config: &Config,
    request: &QueryRequest,
) -> Result<QueryResponse, AppError> {
    validate_request(catalog, config, request)?;

    let addon_codes = dedup_addons(&request.addon_codes);

    let criteria = FilterCriteria {
        radius_miles: f64::from(request.radius_miles),
        require_hospital_rating: request.require_hospital_rating,
        require_doctor_rating: request.require_doctor_rating,
        rating_threshold: config.query.rating_threshold,
    };

    let matches = filter_providers(catalog.providers(), &criteria);
    debug!(
        matched = matches.len(),
        total = catalog.providers().len(),
        "Filtered providers"
    );

    let priced: Vec<PricedProvider> = matches
        .into_iter()
        .map(|provider| price_provider(catalog, provider, &request.procedure_code, &addon_codes))
        .collect();

    let ranked = rank_providers(priced);

    let map_url = match request.display {
        DisplayMode::Map => Some(config.map.url.clone()),
        DisplayMode::Table => None,
    };

    Ok(QueryResponse {
        query_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        procedure_code: request.procedure_code.clone(),
        procedure_name: catalog.procedure_name_for(&request.procedure_code).to_string(),
        zip_code: request.zip_code.clone(),
        radius_miles: request.radius_miles,
        addon_codes,
        display: request.display,
        map_url,
        providers: ranked,
    })
}

fn validate_request(
    catalog: &Catalog,
    config: &Config,
    request: &QueryRequest,
) -> Result<(), AppError> {
    if request.procedure_code.trim().is_empty() {
        return Err(AppError::InvalidQuery(
            "Procedure code must not be empty".to_string(),
        ));
    }

    if request.procedure_code.len() > MAX_PROCEDURE_CODE_LEN {
        return Err(AppError::InvalidQuery(format!(
            "Procedure code must be at most {} characters",
            MAX_PROCEDURE_CODE_LEN
        )));
    }

    let bounds = &config.query;
    if request.radius_miles < bounds.min_radius_miles
        || request.radius_miles > bounds.max_radius_miles
    {
        return Err(AppError::InvalidQuery(format!(
            "Radius must be between {} and {} miles, got {}",
            bounds.min_radius_miles, bounds.max_radius_miles, request.radius_miles
        )));
    }

    if request.display == DisplayMode::Map && !config.map.enabled {
        return Err(AppError::MapUnavailable(
            "Map display is disabled in the server configuration".to_string(),
        ));
    }

    // Add-ons must come from the procedure's eligible complementary set
    let eligible = catalog
        .eligible_addons_for(&request.procedure_code, bounds.addon_frequency_threshold);
    for addon in &request.addon_codes {
        if !eligible.iter().any(|offer| &offer.code == addon) {
            return Err(AppError::IneligibleAddon(format!(
                "Add-on {} is not offered for procedure {}",
                addon, request.procedure_code
            )));
        }
    }

    Ok(())
}

/// Collapse duplicate add-on selections, preserving first-seen order
fn dedup_addons(addon_codes: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(addon_codes.len());
    for code in addon_codes {
        if !seen.contains(code) {
            seen.push(code.clone());
        }
    }
    seen
}
