use super::filters::FilterState;
use crate::catalog::{ListingCatalog, ListingDetails, ListingKind, ListingRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Flattened, render-ready projection of a listing for HTTP and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct ListingResultView {
    pub id: String,
    pub kind: ListingKind,
    pub kind_label: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub broker_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed_on: Option<NaiveDate>,
}

impl ListingResultView {
    pub fn from_record(record: &ListingRecord) -> Self {
        let (price, bedrooms, property_type) = match &record.details {
            ListingDetails::Property(details) => (
                details.price,
                details.bedrooms,
                details.property_type.clone(),
            ),
            ListingDetails::Project(details) => (details.starting_price, None, None),
            _ => (None, None, None),
        };

        Self {
            id: record.id.to_string(),
            kind: record.kind(),
            kind_label: record.kind().label(),
            title: record.display_title().to_string(),
            location: record.location.clone(),
            city: record.city.clone(),
            broker_verified: record.broker_verified,
            price_label: price.map(format_price),
            beds_label: bedrooms.map(|beds| {
                if beds == 0 {
                    "Studio".to_string()
                } else {
                    beds.to_string()
                }
            }),
            property_type,
            listed_on: record.listed_on,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub kind: ListingKind,
    pub kind_label: &'static str,
    pub total: usize,
    pub matched: usize,
    pub active_facets: usize,
    pub broker_first: bool,
}

pub fn summarize(
    catalog: &ListingCatalog,
    filters: &FilterState,
    results: &[ListingRecord],
) -> SearchSummary {
    SearchSummary {
        kind: catalog.kind(),
        kind_label: catalog.kind().label(),
        total: catalog.len(),
        matched: results.len(),
        active_facets: filters.active_facets(),
        broker_first: filters.broker_first,
    }
}

/// Grouped thousands, no currency symbol; the host UI owns currency display.
fn format_price(price: f64) -> String {
    let whole = price.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ListingId, PropertyDetails};

    #[test]
    fn view_formats_price_and_studio_label() {
        let record = ListingRecord {
            id: ListingId::from("p-1"),
            title: None,
            location: Some("JVC".to_string()),
            city: Some("Dubai".to_string()),
            listed_on: None,
            broker_verified: true,
            details: ListingDetails::Property(PropertyDetails {
                price: Some(450_000.0),
                bedrooms: Some(0),
                ..PropertyDetails::default()
            }),
        };

        let view = ListingResultView::from_record(&record);
        assert_eq!(view.title, "Untitled listing");
        assert_eq!(view.price_label.as_deref(), Some("450,000"));
        assert_eq!(view.beds_label.as_deref(), Some("Studio"));
        assert!(view.broker_verified);
    }

    #[test]
    fn format_price_groups_thousands() {
        assert_eq!(format_price(1_250_000.0), "1,250,000");
        assert_eq!(format_price(999.0), "999");
        assert_eq!(format_price(5_000_000.4), "5,000,000");
    }
}
