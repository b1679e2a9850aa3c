use futures::stream::{self, StreamExt};
use time::OffsetDateTime;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::error::{DetailFetchFailure, SearchError};
use crate::models::restaurant::{Coordinates, Restaurant};
use crate::models::search::SearchRecord;
use crate::repositories::search_writer::PersistEvent;
use crate::services::google_maps::{to_restaurant, PlacesApi};

/// The places provider rejects nearby searches beyond 50km.
pub const MAX_RADIUS_KM: f64 = 50.0;

const MIN_DETAIL_CONCURRENCY: usize = 4;

pub struct SearchOutcome {
    pub center: Coordinates,
    pub restaurants: Vec<Restaurant>,
    /// Places dropped because their details fetch failed. The batch itself
    /// still succeeds.
    pub failed_details: Vec<DetailFetchFailure>,
}

/// Orchestrates one search: geocode, nearby search, concurrent per-place
/// details fetches, conversion, and the audit-write hand-off. The provider
/// handle is passed in explicitly so tests can run the whole pipeline
/// against a fake.
pub struct SearchService<P: PlacesApi> {
    places: P,
    persist_tx: UnboundedSender<PersistEvent>,
}

impl<P: PlacesApi> SearchService<P> {
    pub fn new(places: P, persist_tx: UnboundedSender<PersistEvent>) -> Self {
        Self { places, persist_tx }
    }

    pub async fn search(
        &self,
        postal_code: &str,
        radius_km: f64,
    ) -> Result<SearchOutcome, SearchError> {
        let post_code = postal_code.trim();
        if !is_valid_postal_code(post_code) {
            return Err(SearchError::InvalidPostalCode(post_code.to_string()));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(SearchError::InvalidRadius(radius_km));
        }
        let radius_km = radius_km.min(MAX_RADIUS_KM);

        let center = self.places.geocode(post_code).await?;
        let radius_m = (radius_km * 1000.0).round() as u32;
        let summaries = self.places.nearby_search(center, radius_m).await?;

        let place_ids: Vec<String> = summaries
            .into_iter()
            .filter_map(|summary| summary.place_id)
            .collect();

        // Details fetches are independent, so they run concurrently with a
        // bounded fan-out; `buffered` keeps the provider's summary order.
        let places = &self.places;
        let concurrency = num_cpus::get().max(MIN_DETAIL_CONCURRENCY);
        let settled: Vec<Result<Restaurant, DetailFetchFailure>> = stream::iter(place_ids)
            .map(|place_id| async move {
                match places.place_details(&place_id).await {
                    Ok(details) => Ok(to_restaurant(details, center, places)),
                    Err(e) => Err(DetailFetchFailure {
                        place_id,
                        reason: e.to_string(),
                    }),
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut restaurants = Vec::new();
        let mut failed_details = Vec::new();
        for result in settled {
            match result {
                Ok(restaurant) => restaurants.push(restaurant),
                Err(failure) => {
                    warn!("{}, dropping the place from the result set", failure);
                    failed_details.push(failure);
                }
            }
        }

        let record = SearchRecord {
            id: None,
            post_code: post_code.to_string(),
            radius_km,
            timestamp: OffsetDateTime::now_utc(),
            result_count: restaurants.len() as i64,
            coordinates: center,
        };
        let event = PersistEvent::SearchCompleted {
            record,
            restaurants: restaurants.clone(),
        };
        if let Err(e) = self.persist_tx.send(event) {
            warn!("search writer is not running, skipping persistence due to: {}", e);
        }

        Ok(SearchOutcome {
            center,
            restaurants,
            failed_details,
        })
    }
}

// German postal codes are exactly five digits.
fn is_valid_postal_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}
