use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One discovered restaurant. Built once by the place converter and never
/// mutated afterwards; a new search replaces the whole result set.
///
/// Numeric fields the provider may not know are explicit `Option`s so that
/// "unrated" and "rated 0" stay distinguishable.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    /// Kilometers from the search center, rounded to one decimal.
    pub distance_km: Option<f64>,
    pub is_open: Option<bool>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub contact_person: Option<String>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub opening_hours: Option<OpeningHours>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Review {
    pub author: String,
    pub rating: f64,
    pub text: String,
    /// Unix timestamp in seconds.
    pub time: i64,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
    pub open_now: Option<bool>,
    #[serde(default)]
    pub periods: Vec<OpeningPeriod>,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct OpeningPeriod {
    pub open: DayTime,
    pub close: Option<DayTime>,
}

/// Day-of-week index 0-6 (Sunday first) plus an "HHMM" time string, as the
/// places provider reports opening periods.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}
