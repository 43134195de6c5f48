use super::records::{
    coerce_amount, coerce_count, parse_date_lenient, CompletionStatus, ListingDetails, ListingId,
    ListingRecord, PropertyDetails, TransactionType,
};
use super::{ListingCatalog, ListingKind};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FeedImportError {
    #[error("failed to read listing feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing feed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Imports a bulk CSV property feed into a catalog. Rows are matched by
/// header name, trimmed, and decoded leniently: unparseable numbers or
/// unknown enum strings become missing fields rather than import failures.
pub struct ListingFeedImporter;

impl ListingFeedImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ListingCatalog, FeedImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ListingCatalog, FeedImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<FeedRow>() {
            let row = row?;
            records.push(row.into_record());
        }

        Ok(ListingCatalog::new(ListingKind::Property, records))
    }
}

#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(rename = "City", default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(rename = "Bedrooms", default, deserialize_with = "empty_string_as_none")]
    bedrooms: Option<String>,
    #[serde(rename = "Bathrooms", default, deserialize_with = "empty_string_as_none")]
    bathrooms: Option<String>,
    #[serde(rename = "Area Sqft", default, deserialize_with = "empty_string_as_none")]
    area_sqft: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "empty_string_as_none")]
    property_type: Option<String>,
    #[serde(
        rename = "Transaction",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    transaction: Option<String>,
    #[serde(rename = "Completion", default, deserialize_with = "empty_string_as_none")]
    completion: Option<String>,
    #[serde(rename = "Listed At", default, deserialize_with = "empty_string_as_none")]
    listed_at: Option<String>,
    #[serde(
        rename = "Broker Verified",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    broker_verified: Option<String>,
}

impl FeedRow {
    fn into_record(self) -> ListingRecord {
        let details = PropertyDetails {
            price: self.price.as_deref().and_then(string_amount),
            bedrooms: self.bedrooms.as_deref().and_then(string_count),
            bathrooms: self.bathrooms.as_deref().and_then(string_count),
            area_sqft: self.area_sqft.as_deref().and_then(string_amount),
            property_type: self.property_type,
            transaction: self.transaction.as_deref().and_then(TransactionType::parse),
            completion: self.completion.as_deref().and_then(CompletionStatus::parse),
        };

        ListingRecord {
            id: ListingId(self.id),
            title: self.title,
            location: self.location,
            city: self.city,
            listed_on: self.listed_at.as_deref().and_then(parse_date_lenient),
            broker_verified: self
                .broker_verified
                .as_deref()
                .map(truthy_flag)
                .unwrap_or(false),
            details: ListingDetails::Property(details),
        }
    }
}

fn string_amount(raw: &str) -> Option<f64> {
    coerce_amount(&Value::String(raw.to_string()))
}

fn string_count(raw: &str) -> Option<u32> {
    coerce_count(&Value::String(raw.to_string()))
}

fn truthy_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
