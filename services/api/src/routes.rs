use crate::infra::{AppState, CatalogStore};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use propfinder::catalog::{ListingCatalog, ListingKind, TransactionType};
use propfinder::search::{
    filter_listings, summarize, AreaBucket, BathsBucket, BedsBucket, FilterState, ListingResultView,
    PriceBucket, PropertyCategory, PropertySubType, SearchSummary, StatusFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

pub(crate) fn with_listing_routes(store: Arc<CatalogStore>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/listings/search", post(search_endpoint))
        .route("/api/v1/listings/facets", get(facets_endpoint))
        .with_state(store)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchRequest {
    /// Catalog kind to browse; unknown values fall back to `property`.
    #[serde(default)]
    pub(crate) kind: Option<String>,
    /// Optional inline dataset. When present it replaces the server catalog
    /// for this request; a non-array value counts as an empty dataset.
    #[serde(default)]
    pub(crate) records: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) query: Option<String>,
    #[serde(default)]
    pub(crate) transaction: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) sub_types: Vec<String>,
    #[serde(default)]
    pub(crate) beds: Option<String>,
    #[serde(default)]
    pub(crate) baths: Option<String>,
    #[serde(default)]
    pub(crate) price: Option<String>,
    #[serde(default)]
    pub(crate) area: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) broker_first: bool,
}

impl SearchRequest {
    /// Facet labels arrive as free text from clients; unknown labels fall
    /// back to the neutral value instead of failing the request.
    pub(crate) fn filter_state(&self, kind: ListingKind) -> FilterState {
        let mut state = FilterState::defaults(kind)
            .with_query(self.query.clone().unwrap_or_default())
            .with_transaction(
                self.transaction
                    .as_deref()
                    .and_then(TransactionType::parse),
            )
            .with_status(
                self.status
                    .as_deref()
                    .map(StatusFilter::from_label)
                    .unwrap_or_default(),
            )
            .with_category(
                self.category
                    .as_deref()
                    .map(PropertyCategory::from_label)
                    .unwrap_or_default(),
            )
            .with_beds(
                self.beds
                    .as_deref()
                    .map(BedsBucket::from_label)
                    .unwrap_or_default(),
            )
            .with_baths(
                self.baths
                    .as_deref()
                    .map(BathsBucket::from_label)
                    .unwrap_or_default(),
            )
            .with_price(
                self.price
                    .as_deref()
                    .map(PriceBucket::from_label)
                    .unwrap_or_default(),
            )
            .with_area(
                self.area
                    .as_deref()
                    .map(AreaBucket::from_label)
                    .unwrap_or_default(),
            )
            .with_city(self.city.clone().unwrap_or_default())
            .with_broker_first(self.broker_first);

        for raw in &self.sub_types {
            match PropertySubType::from_label(raw) {
                Some(sub_type) => state = state.toggle_sub_type(sub_type),
                None => warn!(label = raw.as_str(), "ignoring unknown sub-type label"),
            }
        }

        state
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchResponse {
    pub(crate) summary: SearchSummary,
    pub(crate) results: Vec<ListingResultView>,
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn search_endpoint(
    State(store): State<Arc<CatalogStore>>,
    Json(payload): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let kind = payload
        .kind
        .as_deref()
        .and_then(ListingKind::parse)
        .unwrap_or_else(|| {
            if let Some(raw) = payload.kind.as_deref() {
                warn!(kind = raw, "unknown catalog kind; defaulting to property");
            }
            ListingKind::Property
        });

    let catalog = match payload.records.clone() {
        Some(records) => ListingCatalog::from_json_value(kind, records),
        None => store.catalog(kind),
    };

    let filters = payload.filter_state(kind);
    let results = filter_listings(&catalog, &filters);
    let summary = summarize(&catalog, &filters, &results);
    let views = results.iter().map(ListingResultView::from_record).collect();

    Json(SearchResponse {
        summary,
        results: views,
    })
}

/// Vocabulary payload for rendering filter chips.
pub(crate) async fn facets_endpoint() -> Json<serde_json::Value> {
    let price: Vec<&str> = PriceBucket::ordered().iter().map(|b| b.label()).collect();
    let beds: Vec<&str> = BedsBucket::ordered().iter().map(|b| b.label()).collect();
    let baths: Vec<&str> = BathsBucket::ordered().iter().map(|b| b.label()).collect();
    let area: Vec<&str> = AreaBucket::ordered().iter().map(|b| b.label()).collect();
    let statuses: Vec<&str> = StatusFilter::ordered().iter().map(|s| s.label()).collect();
    let transactions: Vec<&str> = TransactionType::ordered()
        .iter()
        .map(|t| t.label())
        .collect();
    let kinds: Vec<&str> = ListingKind::ordered().iter().map(|k| k.label()).collect();
    let sub_types: Vec<serde_json::Value> = PropertySubType::ordered()
        .iter()
        .map(|sub| {
            json!({
                "label": sub.label(),
                "category": sub.category().label(),
            })
        })
        .collect();

    Json(json!({
        "kinds": kinds,
        "transactions": transactions,
        "statuses": statuses,
        "price_buckets": price,
        "beds_buckets": beds,
        "baths_buckets": baths,
        "area_buckets": area,
        "sub_types": sub_types,
    }))
}
