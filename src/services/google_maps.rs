use serde::Deserialize;
use tracing::warn;

use crate::error::SearchError;
use crate::models::restaurant::{
    Coordinates, DayTime, OpeningHours, OpeningPeriod, Restaurant, Review,
};
use crate::services::geo;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const PLACE_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
const PLACE_PHOTO_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";

const DETAIL_FIELDS: &str = "name,formatted_address,formatted_phone_number,website,rating,\
    user_ratings_total,reviews,opening_hours,geometry,photos,price_level,place_id";

pub const MAX_PHOTOS: usize = 5;
pub const MAX_REVIEWS: usize = 5;
pub const MAX_PHOTO_WIDTH: u32 = 800;
pub const MAX_PHOTO_HEIGHT: u32 = 600;

/// The three provider calls a search is composed from, plus photo URL
/// resolution. Passed into the aggregator explicitly so tests can substitute
/// a fake.
pub trait PlacesApi: Send + Sync {
    async fn geocode(&self, postal_code: &str) -> Result<Coordinates, SearchError>;

    async fn nearby_search(
        &self,
        center: Coordinates,
        radius_m: u32,
    ) -> Result<Vec<PlaceSummary>, SearchError>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, SearchError>;

    fn photo_url(&self, photo_reference: &str) -> String;
}

#[derive(Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

impl PlacesApi for GoogleMapsClient {
    async fn geocode(&self, postal_code: &str) -> Result<Coordinates, SearchError> {
        let response: GeocodeResponse = self
            .http
            .get(GEOCODE_URL)
            .query(&[
                ("address", postal_code),
                ("components", "country:DE"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        match response.status.as_str() {
            "OK" => response
                .results
                .into_iter()
                .next()
                .map(|result| result.geometry.location)
                .ok_or(SearchError::LocationNotFound),
            "ZERO_RESULTS" => Err(SearchError::LocationNotFound),
            other => Err(SearchError::Provider(format!(
                "geocoding returned status {other}"
            ))),
        }
    }

    async fn nearby_search(
        &self,
        center: Coordinates,
        radius_m: u32,
    ) -> Result<Vec<PlaceSummary>, SearchError> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_m.to_string();

        let response: NearbySearchResponse = self
            .http
            .get(NEARBY_SEARCH_URL)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", "restaurant"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(response.results),
            other => Err(SearchError::Provider(format!(
                "nearby search returned status {other}"
            ))),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, SearchError> {
        let response: PlaceDetailsResponse = self
            .http
            .get(PLACE_DETAILS_URL)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        match (response.status.as_str(), response.result) {
            ("OK", Some(result)) => Ok(result),
            (status, _) => Err(SearchError::Provider(format!(
                "place details returned status {status}"
            ))),
        }
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{PLACE_PHOTO_URL}?maxwidth={MAX_PHOTO_WIDTH}&maxheight={MAX_PHOTO_HEIGHT}\
            &photo_reference={photo_reference}&key={}",
            self.api_key
        )
    }
}

fn provider_error(e: reqwest::Error) -> SearchError {
    SearchError::Provider(e.to_string())
}

/// Converts one raw place record into the domain entity. Total: every
/// missing field degrades to a documented default, so the aggregator can
/// rely on this never failing for a structurally valid record.
pub fn to_restaurant<P: PlacesApi>(
    place: PlaceDetails,
    center: Coordinates,
    places: &P,
) -> Restaurant {
    if place.place_id.is_none() {
        warn!("place record has no place_id, keeping it with an empty id");
    }

    // A record without geometry counts as sitting at the search center.
    let coordinates = place
        .geometry
        .map(|geometry| geometry.location)
        .unwrap_or(center);
    let distance_km = geo::round_to_tenth(geo::distance_km(center, coordinates));

    let address = place
        .formatted_address
        .or(place.vicinity)
        .unwrap_or_default();

    let photos = place
        .photos
        .unwrap_or_default()
        .iter()
        .take(MAX_PHOTOS)
        .map(|photo| places.photo_url(&photo.photo_reference))
        .collect();

    let reviews = place
        .reviews
        .unwrap_or_default()
        .into_iter()
        .take(MAX_REVIEWS)
        .map(|review| Review {
            author: review.author_name.unwrap_or_else(|| "Anonymous".to_string()),
            rating: review.rating.unwrap_or(0.0),
            text: review.text.unwrap_or_default(),
            time: review.time.unwrap_or(0),
        })
        .collect();

    let is_open = place
        .opening_hours
        .as_ref()
        .and_then(|hours| hours.open_now);
    let opening_hours = place.opening_hours.map(|hours| OpeningHours {
        weekday_text: hours.weekday_text.unwrap_or_default(),
        open_now: hours.open_now,
        periods: hours
            .periods
            .unwrap_or_default()
            .into_iter()
            .map(|period| OpeningPeriod {
                open: DayTime {
                    day: period.open.day,
                    time: period.open.time.unwrap_or_default(),
                },
                close: period.close.map(|close| DayTime {
                    day: close.day,
                    time: close.time.unwrap_or_default(),
                }),
            })
            .collect(),
    });

    Restaurant {
        place_id: place.place_id.unwrap_or_default(),
        name: place.name.unwrap_or_else(|| "Unknown".to_string()),
        address,
        coordinates,
        rating: place.rating,
        review_count: place.user_ratings_total,
        distance_km: Some(distance_km),
        is_open,
        phone: place.formatted_phone_number,
        website: place.website,
        email: None,
        contact_person: None,
        price_level: place.price_level,
        photos,
        reviews,
        opening_hours,
    }
}

// Wire types for the Google Maps web services.

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize, Debug)]
struct GeocodeResult {
    geometry: PlaceGeometry,
}

#[derive(Deserialize, Debug)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceSummary>,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct PlaceSummary {
    pub place_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PlaceDetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct PlaceDetails {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub vicinity: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    pub geometry: Option<PlaceGeometry>,
    pub photos: Option<Vec<PlacePhoto>>,
    pub reviews: Option<Vec<PlaceReview>>,
    pub opening_hours: Option<PlaceOpeningHours>,
}

#[derive(Clone, Copy, Deserialize, Debug)]
pub struct PlaceGeometry {
    pub location: Coordinates,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct PlacePhoto {
    #[serde(default)]
    pub photo_reference: String,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct PlaceReview {
    pub author_name: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub time: Option<i64>,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct PlaceOpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Option<Vec<String>>,
    pub periods: Option<Vec<PlaceOpeningPeriod>>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct PlaceOpeningPeriod {
    pub open: PlaceDayTime,
    pub close: Option<PlaceDayTime>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct PlaceDayTime {
    pub day: u8,
    pub time: Option<String>,
}
