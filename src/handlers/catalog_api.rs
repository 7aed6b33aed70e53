use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::AddonOffer;
use crate::handlers::compare::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcedureEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProceduresResponse {
    pub procedures: Vec<ProcedureEntry>,
}

#[derive(Debug, Serialize)]
pub struct AddonsResponse {
    pub procedure_code: String,
    pub procedure_name: String,
    pub addons: Vec<AddonOffer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DoctorEntry {
    pub doctor_name: String,
    pub procedure_codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<DoctorEntry>,
}

/// Handle GET /v1/procedures
/// Returns the procedure directory, sorted by CPT code
pub async fn list_procedures(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.load();

    let mut procedures: Vec<ProcedureEntry> = catalog
        .procedures
        .iter()
        .map(|(code, name)| ProcedureEntry {
            code: code.clone(),
            name: name.clone(),
        })
        .collect();
    procedures.sort_by(|a, b| a.code.cmp(&b.code));

    Json(ProceduresResponse { procedures })
}

/// Handle GET /v1/procedures/{code}/addons
///
/// Returns the complementary services offerable for a procedure. Unknown
/// codes yield the sentinel name and an empty offer list, not an error.
pub async fn list_addons(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let config = state.config.load();
    let catalog = state.catalog.load();

    let addons = catalog.eligible_addons_for(&code, config.query.addon_frequency_threshold);

    Json(AddonsResponse {
        procedure_name: catalog.procedure_name_for(&code).to_string(),
        procedure_code: code,
        addons,
    })
}

/// Handle GET /v1/doctors
///
/// The doctor -> procedures mapping is informational only; it never gates
/// filtering or pricing.
pub async fn list_doctors(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.load();

    let mut doctors: Vec<DoctorEntry> = catalog
        .doctor_procedures
        .iter()
        .map(|(doctor_name, codes)| DoctorEntry {
            doctor_name: doctor_name.clone(),
            procedure_codes: codes.clone(),
        })
        .collect();
    doctors.sort_by(|a, b| a.doctor_name.cmp(&b.doctor_name));

    Json(DoctorsResponse { doctors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;

    fn create_test_state() -> AppState {
        AppState::new(Config::default(), Catalog::builtin())
    }

    #[tokio::test]
    async fn test_list_procedures_sorted() {
        let state = create_test_state();
        let response = list_procedures(State(state)).await.into_response();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_list_addons_for_known_procedure() {
        let state = create_test_state();
        let response = list_addons(State(state), Path("45378".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_list_addons_for_unknown_procedure() {
        let state = create_test_state();
        let response = list_addons(State(state), Path("99999".to_string()))
            .await
            .into_response();
        // Absence is not an error
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_list_doctors() {
        let state = create_test_state();
        let response = list_doctors(State(state)).await.into_response();
        assert_eq!(response.status(), 200);
    }
}
