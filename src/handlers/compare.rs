use arc_swap::ArcSwap;
use axum::{extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{error_type_name, AppError};
use crate::metrics;
use crate::query::{run_query, QueryRequest, QueryResponse};

/// Shared application state.
///
/// Config and catalog sit behind `ArcSwap` so a SIGHUP reload can replace
/// both atomically while requests are in flight.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Config>>,
    pub catalog: Arc<ArcSwap<Catalog>>,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            catalog: Arc::new(ArcSwap::from_pointee(catalog)),
        }
    }
}

/// Handle POST /v1/compare
///
/// Runs the filter -> price -> rank pipeline and returns the ranked,
/// cost-annotated provider list.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let started = Instant::now();
    let config = state.config.load();
    let catalog = state.catalog.load();

    match run_query(&catalog, &config, &request) {
        Ok(response) => {
            metrics::record_query(&response.procedure_code, response.display.as_str());
            metrics::record_result_count(response.providers.len());
            metrics::record_duration(&response.procedure_code, started.elapsed());

            info!(
                query_id = %response.query_id,
                procedure = %response.procedure_code,
                results = response.providers.len(),
                "Comparison query completed"
            );

            Ok(Json(response))
        }
        Err(err) => {
            metrics::record_error(error_type_name(&err));
            warn!(procedure = %request.procedure_code, error = %err, "Comparison query rejected");
            Err(err)
        }
    }
}
