use serde::{Deserialize, Serialize};

/// Price facet buckets. Intervals are half-open: a listing priced exactly at
/// a boundary belongs to the bucket that starts there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBucket {
    #[default]
    Any,
    Under500K,
    From500KTo1M,
    From1MTo2M,
    From2MTo5M,
    Above5M,
}

impl PriceBucket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Any,
            Self::Under500K,
            Self::From500KTo1M,
            Self::From1MTo2M,
            Self::From2MTo5M,
            Self::Above5M,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Under500K => "< 500K",
            Self::From500KTo1M => "500K - 1M",
            Self::From1MTo2M => "1M - 2M",
            Self::From2MTo5M => "2M - 5M",
            Self::Above5M => "5M+",
        }
    }

    /// Lenient label lookup; unrecognized labels fall back to `Any`.
    pub fn from_label(raw: &str) -> Self {
        let needle = normalize_label(raw);
        Self::ordered()
            .into_iter()
            .find(|bucket| normalize_label(bucket.label()) == needle)
            .unwrap_or(Self::Any)
    }

    pub fn matches(self, price: Option<f64>) -> bool {
        if self == Self::Any {
            return true;
        }
        let Some(price) = price else { return false };
        match self {
            Self::Any => true,
            Self::Under500K => price < 500_000.0,
            Self::From500KTo1M => (500_000.0..1_000_000.0).contains(&price),
            Self::From1MTo2M => (1_000_000.0..2_000_000.0).contains(&price),
            Self::From2MTo5M => (2_000_000.0..5_000_000.0).contains(&price),
            Self::Above5M => price >= 5_000_000.0,
        }
    }
}

/// Bedroom facet buckets. A listing with no bedroom count is treated as a
/// studio (0 bedrooms) for bucket comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedsBucket {
    #[default]
    Any,
    Studio,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    SevenPlus,
}

impl BedsBucket {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Any,
            Self::Studio,
            Self::One,
            Self::Two,
            Self::Three,
            Self::Four,
            Self::Five,
            Self::Six,
            Self::SevenPlus,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Studio => "Studio",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::SevenPlus => "7+",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        let needle = normalize_label(raw);
        Self::ordered()
            .into_iter()
            .find(|bucket| normalize_label(bucket.label()) == needle)
            .unwrap_or(Self::Any)
    }

    pub fn matches(self, bedrooms: Option<u32>) -> bool {
        let beds = bedrooms.unwrap_or(0);
        match self {
            Self::Any => true,
            Self::Studio => beds == 0,
            Self::One => beds == 1,
            Self::Two => beds == 2,
            Self::Three => beds == 3,
            Self::Four => beds == 4,
            Self::Five => beds == 5,
            Self::Six => beds == 6,
            Self::SevenPlus => beds >= 7,
        }
    }
}

/// Bathroom facet buckets. Unlike bedrooms, a missing bathroom count fails
/// every bounded bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BathsBucket {
    #[default]
    Any,
    One,
    Two,
    Three,
    Four,
    FivePlus,
}

impl BathsBucket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Any,
            Self::One,
            Self::Two,
            Self::Three,
            Self::Four,
            Self::FivePlus,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::FivePlus => "5+",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        let needle = normalize_label(raw);
        Self::ordered()
            .into_iter()
            .find(|bucket| normalize_label(bucket.label()) == needle)
            .unwrap_or(Self::Any)
    }

    pub fn matches(self, bathrooms: Option<u32>) -> bool {
        if self == Self::Any {
            return true;
        }
        let Some(baths) = bathrooms else { return false };
        match self {
            Self::Any => true,
            Self::One => baths == 1,
            Self::Two => baths == 2,
            Self::Three => baths == 3,
            Self::Four => baths == 4,
            Self::FivePlus => baths >= 5,
        }
    }
}

/// Area facet buckets in square feet, same half-open convention as price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaBucket {
    #[default]
    Any,
    Under500,
    From500To1K,
    From1KTo2K,
    From2KTo5K,
    Above5K,
}

impl AreaBucket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Any,
            Self::Under500,
            Self::From500To1K,
            Self::From1KTo2K,
            Self::From2KTo5K,
            Self::Above5K,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Under500 => "< 500 sqft",
            Self::From500To1K => "500 - 1,000 sqft",
            Self::From1KTo2K => "1,000 - 2,000 sqft",
            Self::From2KTo5K => "2,000 - 5,000 sqft",
            Self::Above5K => "5,000+ sqft",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        let needle = normalize_label(raw);
        Self::ordered()
            .into_iter()
            .find(|bucket| normalize_label(bucket.label()) == needle)
            .unwrap_or(Self::Any)
    }

    pub fn matches(self, area_sqft: Option<f64>) -> bool {
        if self == Self::Any {
            return true;
        }
        let Some(area) = area_sqft else { return false };
        match self {
            Self::Any => true,
            Self::Under500 => area < 500.0,
            Self::From500To1K => (500.0..1_000.0).contains(&area),
            Self::From1KTo2K => (1_000.0..2_000.0).contains(&area),
            Self::From2KTo5K => (2_000.0..5_000.0).contains(&area),
            Self::Above5K => area >= 5_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    Price,
    Beds,
    Baths,
    Area,
}

/// Maps a raw field value to the label of the bucket it falls in, for filter
/// chips. Missing or out-of-range values classify as `Any`.
pub fn classify_bucket(kind: BucketKind, value: Option<f64>) -> &'static str {
    let count = value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u32);

    match kind {
        BucketKind::Price => PriceBucket::ordered()
            .into_iter()
            .skip(1)
            .find(|bucket| bucket.matches(value))
            .unwrap_or(PriceBucket::Any)
            .label(),
        BucketKind::Beds => BedsBucket::ordered()
            .into_iter()
            .skip(1)
            .find(|bucket| bucket.matches(count))
            .unwrap_or(BedsBucket::Any)
            .label(),
        BucketKind::Baths => BathsBucket::ordered()
            .into_iter()
            .skip(1)
            .find(|bucket| bucket.matches(count))
            .unwrap_or(BathsBucket::Any)
            .label(),
        BucketKind::Area => AreaBucket::ordered()
            .into_iter()
            .skip(1)
            .find(|bucket| bucket.matches(value))
            .unwrap_or(AreaBucket::Any)
            .label(),
    }
}

/// Case- and whitespace-insensitive label comparison so chip labels survive
/// round-trips through query strings.
fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .flat_map(|ch| ch.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_boundaries_are_half_open() {
        assert!(PriceBucket::Under500K.matches(Some(499_999.0)));
        assert!(!PriceBucket::Under500K.matches(Some(500_000.0)));
        assert!(PriceBucket::From500KTo1M.matches(Some(500_000.0)));
        assert!(PriceBucket::Above5M.matches(Some(5_000_000.0)));
    }

    #[test]
    fn missing_price_fails_every_bounded_bucket() {
        for bucket in PriceBucket::ordered() {
            assert_eq!(bucket.matches(None), bucket == PriceBucket::Any);
        }
    }

    #[test]
    fn missing_bedrooms_count_as_studio() {
        assert!(BedsBucket::Studio.matches(None));
        assert!(BedsBucket::Any.matches(None));
        assert!(!BedsBucket::Two.matches(None));
        assert!(BedsBucket::SevenPlus.matches(Some(9)));
    }

    #[test]
    fn missing_bathrooms_fail_bounded_buckets() {
        assert!(BathsBucket::Any.matches(None));
        assert!(!BathsBucket::One.matches(None));
        assert!(BathsBucket::FivePlus.matches(Some(6)));
    }

    #[test]
    fn labels_round_trip_through_from_label() {
        for bucket in PriceBucket::ordered() {
            assert_eq!(PriceBucket::from_label(bucket.label()), bucket);
        }
        for bucket in AreaBucket::ordered() {
            assert_eq!(AreaBucket::from_label(bucket.label()), bucket);
        }
        assert_eq!(BedsBucket::from_label("studio"), BedsBucket::Studio);
        assert_eq!(PriceBucket::from_label("< 500k"), PriceBucket::Under500K);
    }

    #[test]
    fn unknown_labels_fall_back_to_any() {
        assert_eq!(PriceBucket::from_label("750K - 2M"), PriceBucket::Any);
        assert_eq!(BedsBucket::from_label("loft"), BedsBucket::Any);
        assert_eq!(AreaBucket::from_label(""), AreaBucket::Any);
    }

    #[test]
    fn classify_bucket_picks_the_containing_interval() {
        assert_eq!(
            classify_bucket(BucketKind::Price, Some(500_000.0)),
            "500K - 1M"
        );
        assert_eq!(classify_bucket(BucketKind::Price, None), "Any");
        assert_eq!(classify_bucket(BucketKind::Beds, Some(0.0)), "Studio");
        assert_eq!(classify_bucket(BucketKind::Baths, Some(7.0)), "5+");
        assert_eq!(
            classify_bucket(BucketKind::Area, Some(1_999.0)),
            "1,000 - 2,000 sqft"
        );
    }
}
