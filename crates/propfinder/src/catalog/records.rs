use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Stable unique identifier of a listing within one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Property,
    Project,
    Agent,
    Agency,
    ChannelPartner,
}

impl ListingKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Property,
            Self::Project,
            Self::Agent,
            Self::Agency,
            Self::ChannelPartner,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Property => "Property",
            Self::Project => "Project",
            Self::Agent => "Agent",
            Self::Agency => "Agency",
            Self::ChannelPartner => "Channel Partner",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "property" | "properties" => Some(Self::Property),
            "project" | "projects" => Some(Self::Project),
            "agent" | "agents" => Some(Self::Agent),
            "agency" | "agencies" => Some(Self::Agency),
            "channel_partner" | "channel-partner" | "channel partner" => {
                Some(Self::ChannelPartner)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Buy,
    Rent,
}

impl TransactionType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Buy, Self::Rent]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Rent => "Rent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buy" | "sale" | "sell" => Some(Self::Buy),
            "rent" | "rental" | "lease" => Some(Self::Rent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Ready,
    OffPlan,
}

impl CompletionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::OffPlan => "Off-Plan",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ready" | "completed" => Some(Self::Ready),
            "off_plan" | "off-plan" | "offplan" | "off plan" | "under_construction" => {
                Some(Self::OffPlan)
            }
            _ => None,
        }
    }
}

/// One listing in a catalog. Common fields live here; kind-specific fields
/// live in the tagged `details` variant so the engine dispatches by kind
/// instead of probing for field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: ListingId,
    #[serde(default, deserialize_with = "trimmed_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "trimmed_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "trimmed_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub listed_on: Option<NaiveDate>,
    #[serde(default)]
    pub broker_verified: bool,
    #[serde(flatten)]
    pub details: ListingDetails,
}

impl ListingRecord {
    pub fn kind(&self) -> ListingKind {
        self.details.kind()
    }

    /// Display title with the render-time placeholder fallback.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled listing")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingDetails {
    Property(PropertyDetails),
    Project(ProjectDetails),
    Agent(AgentDetails),
    Agency(AgencyDetails),
    ChannelPartner(PartnerDetails),
}

impl ListingDetails {
    pub const fn kind(&self) -> ListingKind {
        match self {
            Self::Property(_) => ListingKind::Property,
            Self::Project(_) => ListingKind::Project,
            Self::Agent(_) => ListingKind::Agent,
            Self::Agency(_) => ListingKind::Agency,
            Self::ChannelPartner(_) => ListingKind::ChannelPartner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDetails {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bathrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub area_sqft: Option<f64>,
    #[serde(default, deserialize_with = "trimmed_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_transaction")]
    pub transaction: Option<TransactionType>,
    #[serde(default, deserialize_with = "lenient_completion")]
    pub completion: Option<CompletionStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(default, deserialize_with = "trimmed_string")]
    pub developer: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub starting_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_completion")]
    pub completion: Option<CompletionStatus>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub handover: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentDetails {
    #[serde(default, deserialize_with = "trimmed_string")]
    pub agency: Option<String>,
    #[serde(default)]
    pub service_areas: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgencyDetails {
    #[serde(default)]
    pub service_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartnerDetails {
    #[serde(default)]
    pub developers: Vec<String>,
}

/// Coerces a JSON value to a non-negative amount. Numeric strings are
/// accepted (thousands separators stripped); anything else counts as missing.
pub(crate) fn coerce_amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|amount| amount.is_finite() && *amount >= 0.0)
}

pub(crate) fn coerce_count(value: &Value) -> Option<u32> {
    coerce_amount(value)
        .filter(|amount| amount.fract() == 0.0 && *amount <= u32::MAX as f64)
        .map(|amount| amount as u32)
}

/// Accepts RFC3339 timestamps or plain `%Y-%m-%d` dates.
pub(crate) fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_amount))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_count))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(parse_date_lenient))
}

fn lenient_transaction<'de, D>(deserializer: D) -> Result<Option<TransactionType>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(TransactionType::parse))
}

fn lenient_completion<'de, D>(deserializer: D) -> Result<Option<CompletionStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(CompletionStatus::parse))
}

fn trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_record_deserializes_with_lenient_fields() {
        let record: ListingRecord = serde_json::from_value(json!({
            "id": "p-1",
            "kind": "property",
            "title": "  Marina View 2BR  ",
            "location": "Dubai Marina",
            "price": "1,250,000",
            "bedrooms": 2,
            "bathrooms": "not a number",
            "area_sqft": 1180.5,
            "transaction": "Sale",
            "completion": "off-plan",
            "listed_on": "2026-05-14T09:30:00Z"
        }))
        .expect("record deserializes");

        assert_eq!(record.kind(), ListingKind::Property);
        assert_eq!(record.title.as_deref(), Some("Marina View 2BR"));
        let ListingDetails::Property(details) = &record.details else {
            panic!("expected property details");
        };
        assert_eq!(details.price, Some(1_250_000.0));
        assert_eq!(details.bedrooms, Some(2));
        assert_eq!(details.bathrooms, None);
        assert_eq!(details.transaction, Some(TransactionType::Buy));
        assert_eq!(details.completion, Some(CompletionStatus::OffPlan));
        assert_eq!(
            record.listed_on,
            NaiveDate::from_ymd_opt(2026, 5, 14)
        );
    }

    #[test]
    fn negative_and_fractional_counts_coerce_to_missing() {
        assert_eq!(coerce_amount(&json!(-10)), None);
        assert_eq!(coerce_count(&json!(2.5)), None);
        assert_eq!(coerce_count(&json!("3")), Some(3));
        assert_eq!(coerce_amount(&json!({"nested": true})), None);
    }

    #[test]
    fn agent_record_carries_service_areas() {
        let record: ListingRecord = serde_json::from_value(json!({
            "id": "a-9",
            "kind": "agent",
            "title": "Sara Haddad",
            "agency": "Skyline Realty",
            "service_areas": ["Downtown Dubai", "Business Bay"]
        }))
        .expect("agent deserializes");

        let ListingDetails::Agent(details) = &record.details else {
            panic!("expected agent details");
        };
        assert_eq!(details.service_areas.len(), 2);
        assert!(!record.broker_verified);
    }

    #[test]
    fn display_title_falls_back_to_placeholder() {
        let record: ListingRecord = serde_json::from_value(json!({
            "id": "p-2",
            "kind": "property",
            "title": "   "
        }))
        .expect("record deserializes");

        assert_eq!(record.title, None);
        assert_eq!(record.display_title(), "Untitled listing");
    }
}
