mod import;
mod records;

pub use import::{FeedImportError, ListingFeedImporter};
pub use records::{
    AgencyDetails, AgentDetails, CompletionStatus, ListingDetails, ListingId, ListingKind,
    ListingRecord, PartnerDetails, ProjectDetails, PropertyDetails, TransactionType,
};

use serde_json::Value;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read listing dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("listing dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable, ordered collection of listings of one kind. Construction
/// enforces the catalog invariants (matching kind, unique ids); the filter
/// engine only ever reads from it.
#[derive(Debug, Clone)]
pub struct ListingCatalog {
    kind: ListingKind,
    records: Vec<ListingRecord>,
}

impl ListingCatalog {
    pub fn new(kind: ListingKind, records: Vec<ListingRecord>) -> Self {
        let mut seen: HashSet<ListingId> = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            if record.kind() != kind {
                warn!(
                    id = %record.id,
                    expected = kind.label(),
                    found = record.kind().label(),
                    "dropping listing of mismatched kind"
                );
                continue;
            }
            if !seen.insert(record.id.clone()) {
                warn!(id = %record.id, "dropping listing with duplicate id");
                continue;
            }
            kept.push(record);
        }

        Self { kind, records: kept }
    }

    pub fn empty(kind: ListingKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Builds a catalog from an already-parsed JSON value. A non-array value
    /// degrades to an empty catalog and elements that fail to deserialize
    /// are skipped, so malformed datasets never take the UI down.
    pub fn from_json_value(kind: ListingKind, value: Value) -> Self {
        let Value::Array(items) = value else {
            warn!(
                kind = kind.label(),
                "listing dataset is not a JSON array; treating as empty"
            );
            return Self::empty(kind);
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<ListingRecord>(item) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(index, %err, "skipping malformed listing record");
                }
            }
        }

        Self::new(kind, records)
    }

    pub fn from_json_reader<R: Read>(kind: ListingKind, reader: R) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_reader(reader)?;
        Ok(Self::from_json_value(kind, value))
    }

    pub fn from_json_path<P: AsRef<Path>>(kind: ListingKind, path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(kind, std::io::BufReader::new(file))
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_dataset_degrades_to_empty_catalog() {
        let catalog =
            ListingCatalog::from_json_value(ListingKind::Property, json!({"not": "an array"}));
        assert!(catalog.is_empty());
        assert_eq!(catalog.kind(), ListingKind::Property);
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let catalog = ListingCatalog::from_json_value(
            ListingKind::Property,
            json!([
                {"id": "p-1", "kind": "property", "title": "Studio in JVC"},
                {"kind": "property", "title": "missing id"},
                42
            ]),
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].id, ListingId::from("p-1"));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let catalog = ListingCatalog::from_json_value(
            ListingKind::Property,
            json!([
                {"id": "p-1", "kind": "property", "title": "first"},
                {"id": "p-1", "kind": "property", "title": "second"}
            ]),
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn mismatched_kind_is_dropped() {
        let catalog = ListingCatalog::from_json_value(
            ListingKind::Agent,
            json!([
                {"id": "a-1", "kind": "agent", "title": "Omar"},
                {"id": "p-1", "kind": "property", "title": "2BR"}
            ]),
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.kind(), ListingKind::Agent);
    }
}
