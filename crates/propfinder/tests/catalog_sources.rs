use propfinder::catalog::{
    CatalogError, ListingCatalog, ListingDetails, ListingFeedImporter, ListingKind,
};
use propfinder::search::{classify_bucket, BucketKind};
use std::io::Cursor;
use std::io::Write;

#[test]
fn json_dataset_loads_from_disk() {
    let path = std::env::temp_dir().join(format!(
        "propfinder-dataset-{}.json",
        std::process::id()
    ));
    let payload = r#"[
        {"id": "p-1", "kind": "property", "title": "Palm Villa", "price": 6200000, "bedrooms": 5},
        {"id": "p-2", "kind": "property", "title": "Bay Studio", "price": "480,000", "bedrooms": 0}
    ]"#;
    let mut file = std::fs::File::create(&path).expect("temp dataset writes");
    file.write_all(payload.as_bytes()).expect("payload writes");

    let catalog =
        ListingCatalog::from_json_path(ListingKind::Property, &path).expect("dataset loads");
    std::fs::remove_file(&path).ok();

    assert_eq!(catalog.len(), 2);
    let ListingDetails::Property(details) = &catalog.records()[1].details else {
        panic!("expected property details");
    };
    assert_eq!(details.price, Some(480_000.0));
    assert_eq!(
        classify_bucket(BucketKind::Price, details.price),
        "< 500K"
    );
}

#[test]
fn missing_dataset_file_surfaces_an_io_error() {
    let error = ListingCatalog::from_json_path(ListingKind::Property, "./no-such-dataset.json")
        .expect_err("expected io error");
    match error {
        CatalogError::Io(_) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn invalid_json_surfaces_a_parse_error() {
    let error = ListingCatalog::from_json_reader(
        ListingKind::Property,
        Cursor::new("{not json"),
    )
    .expect_err("expected parse error");
    match error {
        CatalogError::Json(_) => {}
        other => panic!("expected json error, got {other:?}"),
    }
}

#[test]
fn csv_feed_and_json_loader_agree_on_semantics() {
    let csv = "ID,Title,Price,Bedrooms,Transaction\nf-1,Creek 1BR,\"720,000\",1,rent\n";
    let catalog = ListingFeedImporter::from_reader(Cursor::new(csv)).expect("feed imports");

    assert_eq!(catalog.kind(), ListingKind::Property);
    let ListingDetails::Property(details) = &catalog.records()[0].details else {
        panic!("expected property details");
    };
    assert_eq!(details.price, Some(720_000.0));
    assert_eq!(classify_bucket(BucketKind::Price, details.price), "500K - 1M");
    assert_eq!(classify_bucket(BucketKind::Beds, Some(1.0)), "1");
}
