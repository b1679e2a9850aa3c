use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, TimestampMilliSeconds};
use time::OffsetDateTime;

use crate::models::restaurant::Coordinates;

/// Audit record for one completed search. `id` is assigned by the store and
/// only present on rows read back through the history endpoint.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SearchRecord {
    pub id: Option<i64>,
    pub post_code: String,
    pub radius_km: f64,
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub timestamp: OffsetDateTime,
    pub result_count: i64,
    pub coordinates: Coordinates,
}
