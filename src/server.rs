use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    catalog::Catalog,
    config::Config,
    handlers::{self, compare::AppState},
    metrics,
    signals::setup_signal_handlers,
};

/// Start the Care Compare server
///
/// This function:
/// 1. Initializes metrics
/// 2. Loads the catalog named by the configuration
/// 3. Sets up signal handlers for graceful shutdown and config reload
/// 4. Creates the Axum application
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics());

    let catalog = Catalog::load(&config.catalog)?;

    info!(
        "Catalog loaded: {} providers, {} procedures, {} hospital price lists",
        catalog.providers().len(),
        catalog.procedures.len(),
        catalog.prices.len()
    );

    // Config and catalog are swapped atomically on SIGHUP
    let app_state = AppState::new(config.clone(), catalog);

    let (shutdown_tx, signal_handle) = setup_signal_handlers(
        app_state.config.clone(),
        app_state.catalog.clone(),
        config_path,
    );
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting Care Compare on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(app_state: AppState, metrics_handle: Arc<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/v1/compare", post(handlers::compare::handle_compare))
        .route("/v1/procedures", get(handlers::catalog_api::list_procedures))
        .route(
            "/v1/procedures/:code/addons",
            get(handlers::catalog_api::list_addons),
        )
        .route("/v1/doctors", get(handlers::catalog_api::list_doctors))
        .with_state(app_state);

    Router::new()
        // Public endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        // Query payloads are small; keep the body limit tight
        .layer(DefaultBodyLimit::max(64 * 1024))
        // The UI collaborator is an external single-page app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
