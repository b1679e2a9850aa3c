use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures a search can surface to the caller. Per-place detail failures
/// are deliberately not here: they are collected as [`DetailFetchFailure`]
/// and never abort a search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid postal code '{0}', expected exactly 5 digits")]
    InvalidPostalCode(String),

    #[error("search radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),

    #[error("postal code could not be resolved to a location")]
    LocationNotFound,

    #[error("places provider request failed: {0}")]
    Provider(String),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match self {
            SearchError::InvalidPostalCode(_) | SearchError::InvalidRadius(_) => {
                StatusCode::BAD_REQUEST
            }
            SearchError::LocationNotFound => StatusCode::NOT_FOUND,
            SearchError::Provider(_) => StatusCode::BAD_GATEWAY,
        };

        (status, self.to_string()).into_response()
    }
}

/// One dropped place from a search batch, kept so the failure stays visible
/// in logs and in the aggregator's outcome.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to fetch details for place {place_id} due to: {reason}")]
pub struct DetailFetchFailure {
    pub place_id: String,
    pub reason: String,
}
