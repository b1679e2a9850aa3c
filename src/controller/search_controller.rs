use std::sync::Arc;
use axum::{Extension, Router};
use axum::extract::Query;
use axum::response::IntoResponse;
use axum::routing::get;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use crate::controller::AppState;
use crate::models::filter::{FilterState, SortBy};
use crate::models::restaurant::{Coordinates, Restaurant};
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::services::filter;
use crate::services::google_maps::GoogleMapsClient;
use crate::services::search_service::SearchService;

const DEFAULT_RADIUS_KM: f64 = 5.0;
const DEFAULT_HISTORY_LIMIT: i64 = 20;

pub fn router(app_state: AppState) -> Router {
    let search_service = Arc::new(SearchService::new(
        app_state.google_maps.clone(),
        app_state.persist_tx.clone(),
    ));
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/", get(search_restaurants))
        .route("/history", get(retrieve_search_history))
        .route_layer(Extension(search_service))
        .route_layer(Extension(postgres_repo))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchRestaurantsParams {
    pub postal_code: String,
    pub radius_km: Option<f64>,
    pub min_rating: Option<f64>,
    pub only_open: Option<bool>,
    pub sort_by: Option<SortBy>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchResponse {
    pub result_count: usize,
    pub center: Coordinates,
    pub restaurants: Vec<Restaurant>,
}

pub async fn search_restaurants(
    Extension(search_service): Extension<Arc<SearchService<GoogleMapsClient>>>,
    Query(query): Query<SearchRestaurantsParams>,
) -> impl IntoResponse {
    let search_res = search_service
        .search(
            &query.postal_code,
            query.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
        ).await;

    return match search_res {
        Ok(outcome) => {
            let filters = FilterState {
                min_rating: query.min_rating.unwrap_or(0.0),
                only_open: query.only_open.unwrap_or(false),
                sort_by: query.sort_by.unwrap_or_default(),
            };
            let restaurants = filter::derive(&outcome.restaurants, &filters);
            let response = SearchResponse {
                result_count: restaurants.len(),
                center: outcome.center,
                restaurants,
            };
            (StatusCode::OK, json!(response).to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong searching for restaurants due to: {}", e);
            e.into_response()
        }
    };
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchHistoryParam {
    pub limit: Option<i64>,
}

pub async fn retrieve_search_history(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Query(query): Query<SearchHistoryParam>,
) -> impl IntoResponse {
    let history_res = postgres_repo
        .retrieve_search_history(
            query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
        ).await;

    return match history_res {
        Ok(searches) => {
            (StatusCode::OK, json!(&searches).to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong retrieving search history due to: {}", e);
            (
                StatusCode::BAD_REQUEST,
                "Failed to retrieve search history, please try again!"
            ).into_response()
        }
    };
}
