use crate::cli::ServeArgs;
use crate::infra::{load_property_catalog, AppState, CatalogStore};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use propfinder::config::AppConfig;
use propfinder::error::AppError;
use propfinder::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.catalog.take() {
        config.catalog.dataset_path = Some(path);
    }

    telemetry::init(&config)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // The built-in demo catalogs back every kind; an on-disk dataset, when
    // configured, replaces the property catalog.
    let mut store = crate::demo::demo_catalogs();
    if let Some(path) = config.catalog.dataset_path.as_ref() {
        store.insert(load_property_catalog(path)?);
    }

    let app = with_listing_routes(Arc::new(store))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "property marketplace explorer ready");

    axum::serve(listener, app).await?;
    Ok(())
}
