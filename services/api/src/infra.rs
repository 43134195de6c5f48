use metrics_exporter_prometheus::PrometheusHandle;
use propfinder::catalog::{
    ListingCatalog, ListingFeedImporter, ListingKind,
};
use propfinder::contact::{ContactLink, DispatchError, LinkDispatcher};
use propfinder::error::AppError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One catalog per listing kind, loaded at startup and shared read-only with
/// every request.
#[derive(Debug, Default)]
pub(crate) struct CatalogStore {
    catalogs: HashMap<ListingKind, ListingCatalog>,
}

impl CatalogStore {
    pub(crate) fn insert(&mut self, catalog: ListingCatalog) {
        self.catalogs.insert(catalog.kind(), catalog);
    }

    pub(crate) fn catalog(&self, kind: ListingKind) -> ListingCatalog {
        self.catalogs
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ListingCatalog::empty(kind))
    }
}

/// Loads a property dataset from disk, dispatching on the file extension:
/// `.csv` goes through the feed importer, everything else is parsed as JSON.
pub(crate) fn load_property_catalog<P: AsRef<Path>>(path: P) -> Result<ListingCatalog, AppError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let catalog = if is_csv {
        ListingFeedImporter::from_path(path).map_err(AppError::from)?
    } else {
        ListingCatalog::from_json_path(ListingKind::Property, path).map_err(AppError::from)?
    };

    info!(path = %path.display(), records = catalog.len(), "listing dataset loaded");
    Ok(catalog)
}

/// Test/demo stand-in for the platform linking layer: records every link it
/// is asked to open.
#[derive(Default, Clone)]
pub(crate) struct RecordingDispatcher {
    links: Arc<Mutex<Vec<ContactLink>>>,
}

impl LinkDispatcher for RecordingDispatcher {
    fn dispatch(&self, link: ContactLink) -> Result<(), DispatchError> {
        let mut guard = self.links.lock().expect("dispatcher mutex poisoned");
        guard.push(link);
        Ok(())
    }
}

impl RecordingDispatcher {
    pub(crate) fn links(&self) -> Vec<ContactLink> {
        self.links.lock().expect("dispatcher mutex poisoned").clone()
    }
}

/// Lenient kind parsing for CLI flags; unknown values are an input error
/// there, unlike the silent fallback used for HTTP payloads.
pub(crate) fn parse_kind(raw: &str) -> Result<ListingKind, String> {
    ListingKind::parse(raw).ok_or_else(|| {
        format!(
            "unknown catalog kind '{raw}' (expected one of: property, project, agent, agency, channel_partner)"
        )
    })
}
