use super::filters::FilterState;
use crate::catalog::{
    CompletionStatus, ListingCatalog, ListingDetails, ListingRecord, TransactionType,
};

/// Applies every active facet (logical AND) to the catalog and returns the
/// matching records in their original relative order. With `broker_first`,
/// broker-verified matches are stably partitioned to the front. The engine
/// never mutates, truncates, or re-sorts beyond that partition.
pub fn filter_listings(catalog: &ListingCatalog, filters: &FilterState) -> Vec<ListingRecord> {
    let matched: Vec<ListingRecord> = catalog
        .iter()
        .filter(|record| matches_filters(record, filters))
        .cloned()
        .collect();

    if !filters.broker_first {
        return matched;
    }

    let (verified, unverified): (Vec<_>, Vec<_>) = matched
        .into_iter()
        .partition(|record| record.broker_verified);
    let mut ordered = verified;
    ordered.extend(unverified);
    ordered
}

pub fn matches_filters(record: &ListingRecord, filters: &FilterState) -> bool {
    matches_query(record, &filters.query)
        && matches_transaction(record, filters.transaction)
        && filters.status.matches(completion_of(record))
        && matches_sub_types(record, filters)
        && filters.beds.matches(bedrooms_of(record))
        && filters.baths.matches(bathrooms_of(record))
        && filters.price.matches(price_of(record))
        && filters.area.matches(area_of(record))
        && matches_city(record, &filters.city)
}

/// Case-insensitive substring search over the fields relevant to the
/// record's kind. An empty query matches everything.
fn matches_query(record: &ListingRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let mut haystacks: Vec<&str> = Vec::new();
    if let Some(title) = record.title.as_deref() {
        haystacks.push(title);
    }
    if let Some(location) = record.location.as_deref() {
        haystacks.push(location);
    }

    match &record.details {
        ListingDetails::Property(details) => {
            haystacks.extend(details.property_type.as_deref());
        }
        ListingDetails::Project(details) => {
            haystacks.extend(details.developer.as_deref());
        }
        ListingDetails::Agent(details) => {
            haystacks.extend(details.agency.as_deref());
            haystacks.extend(details.service_areas.iter().map(String::as_str));
            haystacks.extend(details.languages.iter().map(String::as_str));
        }
        ListingDetails::Agency(details) => {
            haystacks.extend(details.service_areas.iter().map(String::as_str));
        }
        ListingDetails::ChannelPartner(details) => {
            haystacks.extend(details.developers.iter().map(String::as_str));
        }
    }

    haystacks
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// A record without a transaction type matches either transaction filter.
/// Partial data sources omit the field, and hiding those listings would be
/// worse than over-matching.
fn matches_transaction(record: &ListingRecord, filter: Option<TransactionType>) -> bool {
    let Some(wanted) = filter else { return true };
    match transaction_of(record) {
        Some(transaction) => transaction == wanted,
        None => true,
    }
}

/// OR within the selected sub-type set, AND with the rest of the facets.
/// Matching is a case-insensitive substring test against the record's
/// free-text property type.
fn matches_sub_types(record: &ListingRecord, filters: &FilterState) -> bool {
    if filters.sub_types.is_empty() {
        return true;
    }

    let Some(property_type) = property_type_of(record) else {
        return false;
    };
    let property_type = property_type.to_lowercase();

    filters
        .sub_types
        .iter()
        .filter(|sub| sub.category() == filters.category)
        .any(|sub| property_type.contains(&sub.label().to_lowercase()))
}

/// City equality or location substring, both case-insensitive. Records with
/// no location metadata at all pass, so incomplete records are not hidden.
fn matches_city(record: &ListingRecord, city: &str) -> bool {
    let needle = city.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    if record.city.is_none() && record.location.is_none() {
        return true;
    }

    if let Some(record_city) = record.city.as_deref() {
        if record_city.trim().to_lowercase() == needle {
            return true;
        }
    }

    record
        .location
        .as_deref()
        .is_some_and(|location| location.to_lowercase().contains(&needle))
}

fn transaction_of(record: &ListingRecord) -> Option<TransactionType> {
    match &record.details {
        ListingDetails::Property(details) => details.transaction,
        _ => None,
    }
}

fn completion_of(record: &ListingRecord) -> Option<CompletionStatus> {
    match &record.details {
        ListingDetails::Property(details) => details.completion,
        ListingDetails::Project(details) => details.completion,
        _ => None,
    }
}

fn property_type_of(record: &ListingRecord) -> Option<&str> {
    match &record.details {
        ListingDetails::Property(details) => details.property_type.as_deref(),
        _ => None,
    }
}

fn price_of(record: &ListingRecord) -> Option<f64> {
    match &record.details {
        ListingDetails::Property(details) => details.price,
        ListingDetails::Project(details) => details.starting_price,
        _ => None,
    }
}

fn bedrooms_of(record: &ListingRecord) -> Option<u32> {
    match &record.details {
        ListingDetails::Property(details) => details.bedrooms,
        _ => None,
    }
}

fn bathrooms_of(record: &ListingRecord) -> Option<u32> {
    match &record.details {
        ListingDetails::Property(details) => details.bathrooms,
        _ => None,
    }
}

fn area_of(record: &ListingRecord) -> Option<f64> {
    match &record.details {
        ListingDetails::Property(details) => details.area_sqft,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ListingId, PropertyDetails};

    fn property(id: &str, location: &str) -> ListingRecord {
        ListingRecord {
            id: ListingId::from(id),
            title: None,
            location: Some(location.to_string()),
            city: None,
            listed_on: None,
            broker_verified: false,
            details: ListingDetails::Property(PropertyDetails::default()),
        }
    }

    #[test]
    fn query_matches_location_substring_case_insensitively() {
        let downtown = property("1", "Downtown Dubai");
        let abu_dhabi = property("2", "Abu Dhabi");
        let filters = FilterState::defaults(crate::catalog::ListingKind::Property)
            .with_query("dubai");

        assert!(matches_filters(&downtown, &filters));
        assert!(!matches_filters(&abu_dhabi, &filters));
    }

    #[test]
    fn city_filter_passes_records_without_location_metadata() {
        let mut bare = property("1", "ignored");
        bare.location = None;
        bare.city = None;
        let filters =
            FilterState::defaults(crate::catalog::ListingKind::Property).with_city("Dubai");

        assert!(matches_filters(&bare, &filters));
    }

    #[test]
    fn city_filter_accepts_equality_or_location_substring() {
        let mut record = property("1", "Bluewaters Island");
        record.city = Some("Dubai".to_string());
        let filters =
            FilterState::defaults(crate::catalog::ListingKind::Property).with_city("DUBAI");
        assert!(matches_filters(&record, &filters));

        let filters = filters.with_city("bluewaters");
        assert!(matches_filters(&record, &filters));

        let filters = filters.with_city("Sharjah");
        assert!(!matches_filters(&record, &filters));
    }

    #[test]
    fn city_comparison_folds_non_ascii_case() {
        let mut record = property("1", "Corniche");
        record.city = Some("Dubaï".to_string());
        let filters =
            FilterState::defaults(crate::catalog::ListingKind::Property).with_city("DUBAÏ");

        assert!(matches_filters(&record, &filters));
    }
}
