use crate::infra::{load_property_catalog, parse_kind, CatalogStore, RecordingDispatcher};
use chrono::NaiveDate;
use clap::Args;
use propfinder::catalog::{
    AgencyDetails, AgentDetails, CompletionStatus, ListingCatalog, ListingDetails, ListingId,
    ListingKind, ListingRecord, PartnerDetails, ProjectDetails, PropertyDetails, TransactionType,
};
use propfinder::contact::{build_link, ContactChannel, ContactRequest, LinkDispatcher};
use propfinder::error::AppError;
use propfinder::search::{
    filter_listings, summarize, AreaBucket, BathsBucket, BedsBucket, FilterState,
    ListingResultView, PriceBucket, PropertyCategory, PropertySubType, StatusFilter,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Path to a listing dataset (.json, or .csv for property feeds)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Catalog kind to browse
    #[arg(long, default_value = "property", value_parser = parse_kind)]
    pub(crate) kind: ListingKind,
    /// Free-text search over titles, locations, and kind-specific fields
    #[arg(long, default_value = "")]
    pub(crate) query: String,
    /// Transaction filter: buy or rent
    #[arg(long)]
    pub(crate) transaction: Option<String>,
    /// Completion filter: ready or off-plan
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Property category: residential or commercial
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Property sub-type chip, repeatable (e.g. --sub-type Villa)
    #[arg(long = "sub-type")]
    pub(crate) sub_types: Vec<String>,
    /// Price bucket label (e.g. "< 500K")
    #[arg(long)]
    pub(crate) price: Option<String>,
    /// Beds bucket label (e.g. Studio, 3, 7+)
    #[arg(long)]
    pub(crate) beds: Option<String>,
    /// Baths bucket label
    #[arg(long)]
    pub(crate) baths: Option<String>,
    /// Area bucket label (e.g. "500 - 1,000 sqft")
    #[arg(long)]
    pub(crate) area: Option<String>,
    /// City filter
    #[arg(long, default_value = "")]
    pub(crate) city: String,
    /// Float broker-verified listings to the top
    #[arg(long)]
    pub(crate) broker_first: bool,
    /// Cap the number of printed rows (matching is never truncated)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print every matching row for each scenario
    #[arg(long)]
    pub(crate) list_results: bool,
    /// Skip the contact-link portion of the demo
    #[arg(long)]
    pub(crate) skip_contacts: bool,
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let catalog = match args.catalog.as_ref() {
        Some(path) => {
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                load_property_catalog(path)?
            } else {
                ListingCatalog::from_json_path(args.kind, path)?
            }
        }
        None => demo_catalogs().catalog(args.kind),
    };

    let mut filters = FilterState::defaults(args.kind)
        .with_query(args.query.clone())
        .with_transaction(args.transaction.as_deref().and_then(TransactionType::parse))
        .with_status(
            args.status
                .as_deref()
                .map(StatusFilter::from_label)
                .unwrap_or_default(),
        )
        .with_category(
            args.category
                .as_deref()
                .map(PropertyCategory::from_label)
                .unwrap_or_default(),
        )
        .with_price(args.price.as_deref().map(PriceBucket::from_label).unwrap_or_default())
        .with_beds(args.beds.as_deref().map(BedsBucket::from_label).unwrap_or_default())
        .with_baths(args.baths.as_deref().map(BathsBucket::from_label).unwrap_or_default())
        .with_area(args.area.as_deref().map(AreaBucket::from_label).unwrap_or_default())
        .with_city(args.city.clone())
        .with_broker_first(args.broker_first);

    for raw in &args.sub_types {
        match PropertySubType::from_label(raw) {
            Some(sub_type) => filters = filters.toggle_sub_type(sub_type),
            None => println!("Ignoring unknown sub-type '{raw}'"),
        }
    }

    let results = filter_listings(&catalog, &filters);
    let summary = summarize(&catalog, &filters, &results);

    println!(
        "{} catalog: {} of {} listings match ({} active facets)",
        summary.kind_label, summary.matched, summary.total, summary.active_facets
    );

    let shown = args.limit.unwrap_or(results.len()).min(results.len());
    for record in results.iter().take(shown) {
        print_result(&ListingResultView::from_record(record));
    }
    if shown < results.len() {
        println!("... and {} more", results.len() - shown);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = demo_catalogs();
    let properties = store.catalog(ListingKind::Property);

    println!("Property marketplace demo");
    println!(
        "Catalog: {} properties, {} projects, {} agents",
        properties.len(),
        store.catalog(ListingKind::Project).len(),
        store.catalog(ListingKind::Agent).len()
    );

    let scenarios: Vec<(&str, FilterState)> = vec![
        (
            "All listings (neutral filters)",
            FilterState::defaults(ListingKind::Property),
        ),
        (
            "Search 'marina'",
            FilterState::defaults(ListingKind::Property).with_query("marina"),
        ),
        (
            "Under 500K",
            FilterState::defaults(ListingKind::Property).with_price(PriceBucket::Under500K),
        ),
        (
            "Studios for rent",
            FilterState::defaults(ListingKind::Property)
                .with_beds(BedsBucket::Studio)
                .with_transaction(Some(TransactionType::Rent)),
        ),
        (
            "Ready villas, broker-verified first",
            FilterState::defaults(ListingKind::Property)
                .with_status(StatusFilter::Ready)
                .toggle_sub_type(PropertySubType::Villa)
                .with_broker_first(true),
        ),
    ];

    for (name, filters) in &scenarios {
        let results = filter_listings(&properties, filters);
        let summary = summarize(&properties, filters, &results);
        println!("\n{name}: {}/{} match", summary.matched, summary.total);
        if args.list_results {
            for record in &results {
                print_result(&ListingResultView::from_record(record));
            }
        }
    }

    let agents = store.catalog(ListingKind::Agent);
    let filters = FilterState::defaults(ListingKind::Agent).with_query("downtown");
    let matching_agents = filter_listings(&agents, &filters);
    println!(
        "\nAgents covering Downtown: {} of {}",
        matching_agents.len(),
        agents.len()
    );

    if args.skip_contacts {
        return Ok(());
    }

    println!("\nContact actions for the first matching agent");
    let dispatcher = RecordingDispatcher::default();
    let requests = [
        ContactRequest {
            channel: ContactChannel::Call,
            phone: Some("+971 50 123 4567".to_string()),
            email: None,
            subject: None,
            message: None,
        },
        ContactRequest {
            channel: ContactChannel::WhatsApp,
            phone: Some("+971 50 123 4567".to_string()),
            email: None,
            subject: None,
            message: Some("Hi, I found your profile on the marketplace".to_string()),
        },
        ContactRequest {
            channel: ContactChannel::Email,
            phone: None,
            email: Some("agents@skyline-realty.example".to_string()),
            subject: Some("Listing inquiry".to_string()),
            message: Some("Could we schedule a viewing this week?".to_string()),
        },
    ];

    for request in &requests {
        match build_link(request) {
            Ok(link) => {
                if let Err(err) = dispatcher.dispatch(link) {
                    println!("  {} link could not be dispatched: {err}", request.channel.label());
                }
            }
            Err(err) => println!("  {} link unavailable: {err}", request.channel.label()),
        }
    }

    for link in dispatcher.links() {
        println!("  {} -> {}", link.channel.label(), link.href);
    }

    Ok(())
}

fn print_result(view: &ListingResultView) {
    let mut parts = vec![format!("[{}] {}", view.id, view.title)];
    if let Some(beds) = &view.beds_label {
        parts.push(format!("{beds} BR"));
    }
    if let Some(price) = &view.price_label {
        parts.push(price.clone());
    }
    if let Some(location) = &view.location {
        parts.push(location.clone());
    }
    if view.broker_verified {
        parts.push("broker-verified".to_string());
    }
    println!("  {}", parts.join(" | "));
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn property(
    id: &str,
    title: &str,
    location: &str,
    broker_verified: bool,
    details: PropertyDetails,
) -> ListingRecord {
    ListingRecord {
        id: ListingId::from(id),
        title: Some(title.to_string()),
        location: Some(location.to_string()),
        city: Some("Dubai".to_string()),
        listed_on: date(2026, 7, 12),
        broker_verified,
        details: ListingDetails::Property(details),
    }
}

/// Built-in catalogs backing the demo and any deployment without a dataset.
pub(crate) fn demo_catalogs() -> CatalogStore {
    let mut store = CatalogStore::default();

    // Partial-feed record: no display or location metadata at all.
    let plot = ListingRecord {
        id: ListingId::from("p-8"),
        title: None,
        location: None,
        city: None,
        listed_on: None,
        broker_verified: false,
        details: ListingDetails::Property(PropertyDetails {
            property_type: Some("Villa".to_string()),
            ..PropertyDetails::default()
        }),
    };
    store.insert(ListingCatalog::new(
        ListingKind::Property,
        vec![
            property(
                "p-1",
                "Marina View 2BR",
                "Dubai Marina",
                true,
                PropertyDetails {
                    price: Some(1_250_000.0),
                    bedrooms: Some(2),
                    bathrooms: Some(2),
                    area_sqft: Some(1_180.0),
                    property_type: Some("Apartment".to_string()),
                    transaction: Some(TransactionType::Buy),
                    completion: Some(CompletionStatus::Ready),
                },
            ),
            property(
                "p-2",
                "JVC Studio",
                "Jumeirah Village Circle",
                false,
                PropertyDetails {
                    price: Some(58_000.0),
                    bedrooms: Some(0),
                    bathrooms: Some(1),
                    area_sqft: Some(420.0),
                    property_type: Some("Apartment".to_string()),
                    transaction: Some(TransactionType::Rent),
                    completion: Some(CompletionStatus::Ready),
                },
            ),
            property(
                "p-3",
                "Palm Signature Villa",
                "Palm Jumeirah",
                true,
                PropertyDetails {
                    price: Some(18_500_000.0),
                    bedrooms: Some(6),
                    bathrooms: Some(7),
                    area_sqft: Some(9_200.0),
                    property_type: Some("Villa".to_string()),
                    transaction: Some(TransactionType::Buy),
                    completion: Some(CompletionStatus::Ready),
                },
            ),
            property(
                "p-4",
                "Creek Harbour 1BR",
                "Dubai Creek Harbour",
                false,
                PropertyDetails {
                    price: Some(980_000.0),
                    bedrooms: Some(1),
                    bathrooms: Some(1),
                    area_sqft: Some(760.0),
                    property_type: Some("Apartment".to_string()),
                    transaction: Some(TransactionType::Buy),
                    completion: Some(CompletionStatus::OffPlan),
                },
            ),
            property(
                "p-5",
                "Affordable Townhouse",
                "Dubailand",
                false,
                PropertyDetails {
                    price: Some(470_000.0),
                    bedrooms: Some(3),
                    bathrooms: Some(3),
                    area_sqft: Some(2_050.0),
                    property_type: Some("Townhouse".to_string()),
                    transaction: Some(TransactionType::Buy),
                    completion: Some(CompletionStatus::Ready),
                },
            ),
            property(
                "p-6",
                "Bay Square Office",
                "Business Bay",
                true,
                PropertyDetails {
                    price: Some(2_400_000.0),
                    bedrooms: None,
                    bathrooms: Some(2),
                    area_sqft: Some(1_650.0),
                    property_type: Some("Fitted Office".to_string()),
                    transaction: Some(TransactionType::Buy),
                    completion: Some(CompletionStatus::Ready),
                },
            ),
            property(
                "p-7",
                "Marina Penthouse",
                "Dubai Marina",
                false,
                PropertyDetails {
                    price: Some(7_900_000.0),
                    bedrooms: Some(4),
                    bathrooms: Some(5),
                    area_sqft: Some(4_800.0),
                    property_type: Some("Penthouse".to_string()),
                    transaction: None,
                    completion: Some(CompletionStatus::Ready),
                },
            ),
            plot,
        ],
    ));

    store.insert(ListingCatalog::new(
        ListingKind::Project,
        vec![
            ListingRecord {
                id: ListingId::from("pr-1"),
                title: Some("Creek Rise Towers".to_string()),
                location: Some("Dubai Creek Harbour".to_string()),
                city: Some("Dubai".to_string()),
                listed_on: date(2026, 6, 1),
                broker_verified: false,
                details: ListingDetails::Project(ProjectDetails {
                    developer: Some("Emaar".to_string()),
                    starting_price: Some(1_400_000.0),
                    completion: Some(CompletionStatus::OffPlan),
                    handover: date(2028, 3, 31),
                }),
            },
            ListingRecord {
                id: ListingId::from("pr-2"),
                title: Some("Harbour Gate".to_string()),
                location: Some("Mina Rashid".to_string()),
                city: Some("Dubai".to_string()),
                listed_on: date(2026, 4, 18),
                broker_verified: false,
                details: ListingDetails::Project(ProjectDetails {
                    developer: Some("Nakheel".to_string()),
                    starting_price: Some(650_000.0),
                    completion: Some(CompletionStatus::Ready),
                    handover: None,
                }),
            },
        ],
    ));

    store.insert(ListingCatalog::new(
        ListingKind::Agent,
        vec![
            ListingRecord {
                id: ListingId::from("a-1"),
                title: Some("Sara Haddad".to_string()),
                location: Some("Downtown Dubai".to_string()),
                city: Some("Dubai".to_string()),
                listed_on: None,
                broker_verified: true,
                details: ListingDetails::Agent(AgentDetails {
                    agency: Some("Skyline Realty".to_string()),
                    service_areas: vec![
                        "Downtown Dubai".to_string(),
                        "Business Bay".to_string(),
                    ],
                    languages: vec!["English".to_string(), "Arabic".to_string()],
                }),
            },
            ListingRecord {
                id: ListingId::from("a-2"),
                title: Some("Omar Khalil".to_string()),
                location: Some("Dubai Marina".to_string()),
                city: Some("Dubai".to_string()),
                listed_on: None,
                broker_verified: false,
                details: ListingDetails::Agent(AgentDetails {
                    agency: Some("Harbour Homes".to_string()),
                    service_areas: vec!["Dubai Marina".to_string(), "Palm Jumeirah".to_string()],
                    languages: vec!["English".to_string(), "French".to_string()],
                }),
            },
        ],
    ));

    store.insert(ListingCatalog::new(
        ListingKind::Agency,
        vec![ListingRecord {
            id: ListingId::from("ag-1"),
            title: Some("Skyline Realty".to_string()),
            location: Some("Downtown Dubai".to_string()),
            city: Some("Dubai".to_string()),
            listed_on: None,
            broker_verified: true,
            details: ListingDetails::Agency(AgencyDetails {
                service_areas: vec!["Downtown Dubai".to_string(), "City Walk".to_string()],
            }),
        }],
    ));

    store.insert(ListingCatalog::new(
        ListingKind::ChannelPartner,
        vec![ListingRecord {
            id: ListingId::from("cp-1"),
            title: Some("Gulf Gateway Partners".to_string()),
            location: Some("Business Bay".to_string()),
            city: Some("Dubai".to_string()),
            listed_on: None,
            broker_verified: false,
            details: ListingDetails::ChannelPartner(PartnerDetails {
                developers: vec!["Emaar".to_string(), "Sobha".to_string()],
            }),
        }],
    ));

    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalogs_cover_every_kind() {
        let store = demo_catalogs();
        for kind in ListingKind::ordered() {
            assert!(
                !store.catalog(kind).is_empty(),
                "demo catalog for {} should not be empty",
                kind.label()
            );
        }
    }

    #[test]
    fn demo_scenarios_produce_matches() {
        let store = demo_catalogs();
        let properties = store.catalog(ListingKind::Property);

        let marina = FilterState::defaults(ListingKind::Property).with_query("marina");
        assert!(filter_listings(&properties, &marina).len() >= 2);

        let under_500k =
            FilterState::defaults(ListingKind::Property).with_price(PriceBucket::Under500K);
        let matches = filter_listings(&properties, &under_500k);
        assert!(matches.iter().any(|record| record.id.0 == "p-5"));
        // The rent-priced studio also lands under 500K by raw amount.
        assert!(matches.iter().any(|record| record.id.0 == "p-2"));
    }

    #[test]
    fn partial_record_survives_every_neutral_scenario() {
        let store = demo_catalogs();
        let properties = store.catalog(ListingKind::Property);
        let filters = FilterState::defaults(ListingKind::Property).with_city("Dubai");

        // p-8 has no location metadata at all and must not be hidden.
        let results = filter_listings(&properties, &filters);
        assert!(results.iter().any(|record| record.id.0 == "p-8"));
    }
}
