use serde::{Deserialize, Serialize};

/// Criteria the filter/sort engine derives the displayed list from.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FilterState {
    /// 0 means "no rating filter".
    pub min_rating: f64,
    pub only_open: bool,
    pub sort_by: SortBy,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            only_open: false,
            sort_by: SortBy::Distance,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Distance,
    Rating,
    ReviewCount,
    Name,
}
