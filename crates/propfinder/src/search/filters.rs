use super::buckets::{AreaBucket, BathsBucket, BedsBucket, PriceBucket};
use crate::catalog::{CompletionStatus, ListingKind, TransactionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    #[default]
    Residential,
    Commercial,
}

impl PropertyCategory {
    pub const fn ordered() -> [Self; 2] {
        [Self::Residential, Self::Commercial]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "commercial" => Self::Commercial,
            _ => Self::Residential,
        }
    }
}

/// Fixed sub-type vocabulary shown as filter chips; each sub-type belongs to
/// exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySubType {
    Apartment,
    Villa,
    Townhouse,
    Penthouse,
    Duplex,
    Office,
    Shop,
    Warehouse,
    Showroom,
}

impl PropertySubType {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Apartment,
            Self::Villa,
            Self::Townhouse,
            Self::Penthouse,
            Self::Duplex,
            Self::Office,
            Self::Shop,
            Self::Warehouse,
            Self::Showroom,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::Villa => "Villa",
            Self::Townhouse => "Townhouse",
            Self::Penthouse => "Penthouse",
            Self::Duplex => "Duplex",
            Self::Office => "Office",
            Self::Shop => "Shop",
            Self::Warehouse => "Warehouse",
            Self::Showroom => "Showroom",
        }
    }

    pub const fn category(self) -> PropertyCategory {
        match self {
            Self::Apartment | Self::Villa | Self::Townhouse | Self::Penthouse | Self::Duplex => {
                PropertyCategory::Residential
            }
            Self::Office | Self::Shop | Self::Warehouse | Self::Showroom => {
                PropertyCategory::Commercial
            }
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|sub| sub.label().eq_ignore_ascii_case(&needle))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Ready,
    OffPlan,
}

impl StatusFilter {
    pub const fn ordered() -> [Self; 3] {
        [Self::All, Self::Ready, Self::OffPlan]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Ready => "Ready",
            Self::OffPlan => "Off-Plan",
        }
    }

    /// Lenient label lookup; unrecognized labels fall back to `All`.
    pub fn from_label(raw: &str) -> Self {
        match CompletionStatus::parse(raw) {
            Some(CompletionStatus::Ready) => Self::Ready,
            Some(CompletionStatus::OffPlan) => Self::OffPlan,
            None => Self::All,
        }
    }

    pub fn matches(self, completion: Option<CompletionStatus>) -> bool {
        match self {
            Self::All => true,
            Self::Ready => completion == Some(CompletionStatus::Ready),
            Self::OffPlan => completion == Some(CompletionStatus::OffPlan),
        }
    }
}

/// The full facet selection for one catalog screen. Values are immutable;
/// every transition produces a new state, and `clear` resets all facets
/// atomically while keeping the catalog kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub catalog_kind: ListingKind,
    pub query: String,
    pub transaction: Option<TransactionType>,
    pub status: StatusFilter,
    pub category: PropertyCategory,
    /// Selected sub-types in first-selection order; rendering follows this
    /// order, matching is order-independent.
    pub sub_types: Vec<PropertySubType>,
    pub beds: BedsBucket,
    pub baths: BathsBucket,
    pub price: PriceBucket,
    pub area: AreaBucket,
    pub city: String,
    pub broker_first: bool,
}

impl FilterState {
    pub fn defaults(catalog_kind: ListingKind) -> Self {
        Self {
            catalog_kind,
            query: String::new(),
            transaction: None,
            status: StatusFilter::All,
            category: PropertyCategory::Residential,
            sub_types: Vec::new(),
            beds: BedsBucket::Any,
            baths: BathsBucket::Any,
            price: PriceBucket::Any,
            area: AreaBucket::Any,
            city: String::new(),
            broker_first: false,
        }
    }

    pub fn clear(&self) -> Self {
        Self::defaults(self.catalog_kind)
    }

    /// True when no facet narrows the catalog. The category toggle alone is
    /// neutral: it only becomes a predicate once sub-types are selected.
    pub fn is_neutral(&self) -> bool {
        self.query.trim().is_empty()
            && self.transaction.is_none()
            && self.status == StatusFilter::All
            && self.sub_types.is_empty()
            && self.beds == BedsBucket::Any
            && self.baths == BathsBucket::Any
            && self.price == PriceBucket::Any
            && self.area == AreaBucket::Any
            && self.city.trim().is_empty()
            && !self.broker_first
    }

    /// Count of active facets, used by result summaries.
    pub fn active_facets(&self) -> usize {
        [
            !self.query.trim().is_empty(),
            self.transaction.is_some(),
            self.status != StatusFilter::All,
            !self.sub_types.is_empty(),
            self.beds != BedsBucket::Any,
            self.baths != BathsBucket::Any,
            self.price != PriceBucket::Any,
            self.area != AreaBucket::Any,
            !self.city.trim().is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_transaction(mut self, transaction: Option<TransactionType>) -> Self {
        self.transaction = transaction;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Switching category drops selections from the other vocabulary, since
    /// only sub-types of the active category are eligible.
    pub fn with_category(mut self, category: PropertyCategory) -> Self {
        if self.category != category {
            self.category = category;
            self.sub_types.retain(|sub| sub.category() == category);
        }
        self
    }

    /// Toggle-set semantics: re-selecting a sub-type deselects it, first
    /// selection order is preserved otherwise.
    pub fn toggle_sub_type(mut self, sub_type: PropertySubType) -> Self {
        if let Some(index) = self.sub_types.iter().position(|sub| *sub == sub_type) {
            self.sub_types.remove(index);
        } else if sub_type.category() == self.category {
            self.sub_types.push(sub_type);
        }
        self
    }

    pub fn with_beds(mut self, beds: BedsBucket) -> Self {
        self.beds = beds;
        self
    }

    pub fn with_baths(mut self, baths: BathsBucket) -> Self {
        self.baths = baths;
        self
    }

    pub fn with_price(mut self, price: PriceBucket) -> Self {
        self.price = price;
        self
    }

    pub fn with_area(mut self, area: AreaBucket) -> Self {
        self.area = area;
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_broker_first(mut self, broker_first: bool) -> Self {
        self.broker_first = broker_first;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let state = FilterState::defaults(ListingKind::Property);
        assert!(state.is_neutral());
        assert_eq!(state.active_facets(), 0);
    }

    #[test]
    fn clear_resets_everything_but_the_catalog_kind() {
        let state = FilterState::defaults(ListingKind::Agent)
            .with_query("marina")
            .with_transaction(Some(TransactionType::Rent))
            .with_status(StatusFilter::Ready)
            .with_price(PriceBucket::From1MTo2M)
            .with_city("Dubai")
            .with_broker_first(true);

        assert!(!state.is_neutral());
        let cleared = state.clear();
        assert_eq!(cleared, FilterState::defaults(ListingKind::Agent));
    }

    #[test]
    fn toggle_sub_type_preserves_selection_order() {
        let state = FilterState::defaults(ListingKind::Property)
            .toggle_sub_type(PropertySubType::Villa)
            .toggle_sub_type(PropertySubType::Apartment)
            .toggle_sub_type(PropertySubType::Penthouse)
            .toggle_sub_type(PropertySubType::Apartment);

        assert_eq!(
            state.sub_types,
            vec![PropertySubType::Villa, PropertySubType::Penthouse]
        );
    }

    #[test]
    fn switching_category_drops_foreign_sub_types() {
        let state = FilterState::defaults(ListingKind::Property)
            .toggle_sub_type(PropertySubType::Villa)
            .with_category(PropertyCategory::Commercial);

        assert!(state.sub_types.is_empty());
        // A sub-type from the inactive vocabulary cannot be selected.
        let state = state.toggle_sub_type(PropertySubType::Apartment);
        assert!(state.sub_types.is_empty());
        let state = state.toggle_sub_type(PropertySubType::Office);
        assert_eq!(state.sub_types, vec![PropertySubType::Office]);
    }

    #[test]
    fn status_filter_requires_exact_completion() {
        assert!(StatusFilter::All.matches(None));
        assert!(!StatusFilter::Ready.matches(None));
        assert!(StatusFilter::Ready.matches(Some(CompletionStatus::Ready)));
        assert!(!StatusFilter::Ready.matches(Some(CompletionStatus::OffPlan)));
        assert_eq!(StatusFilter::from_label("off plan"), StatusFilter::OffPlan);
        assert_eq!(StatusFilter::from_label("whatever"), StatusFilter::All);
    }
}
