mod buckets;
mod engine;
mod filters;
mod views;

pub use buckets::{classify_bucket, AreaBucket, BathsBucket, BedsBucket, BucketKind, PriceBucket};
pub use engine::{filter_listings, matches_filters};
pub use filters::{FilterState, PropertyCategory, PropertySubType, StatusFilter};
pub use views::{summarize, ListingResultView, SearchSummary};
