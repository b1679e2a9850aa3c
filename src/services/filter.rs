use std::cmp::Ordering;

use crate::models::filter::{FilterState, SortBy};
use crate::models::restaurant::Restaurant;

/// Derives the displayable list from the raw result set and the active
/// filter criteria. Pure: equal inputs always produce equal output, and the
/// sort is stable so ties keep their original relative order.
///
/// Unknown ratings and review counts are treated as 0, which means any
/// positive `min_rating` threshold excludes unrated restaurants. An unknown
/// open-state is not "open". An unknown distance also sorts as 0 and thus
/// first; that mirrors the behavior searches have always shown and only
/// affects restaurants loaded back from the store without a search center.
pub fn derive(all: &[Restaurant], filters: &FilterState) -> Vec<Restaurant> {
    let mut results: Vec<Restaurant> = all
        .iter()
        .filter(|r| filters.min_rating <= 0.0 || r.rating.unwrap_or(0.0) >= filters.min_rating)
        .filter(|r| !filters.only_open || r.is_open == Some(true))
        .cloned()
        .collect();

    match filters.sort_by {
        SortBy::Distance => results.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(0.0)
                .total_cmp(&b.distance_km.unwrap_or(0.0))
        }),
        SortBy::Rating => {
            results.sort_by(|a, b| b.rating.unwrap_or(0.0).total_cmp(&a.rating.unwrap_or(0.0)))
        }
        SortBy::ReviewCount => results
            .sort_by(|a, b| b.review_count.unwrap_or(0).cmp(&a.review_count.unwrap_or(0))),
        SortBy::Name => results.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }

    results
}

// Case-insensitive comparison stands in for full locale collation, which the
// standard library does not provide.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::restaurant::Coordinates;

    fn restaurant(place_id: &str) -> Restaurant {
        Restaurant {
            place_id: place_id.to_string(),
            name: format!("Restaurant {place_id}"),
            address: String::new(),
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            rating: None,
            review_count: None,
            distance_km: None,
            is_open: None,
            phone: None,
            website: None,
            email: None,
            contact_person: None,
            price_level: None,
            photos: Vec::new(),
            reviews: Vec::new(),
            opening_hours: None,
        }
    }

    fn ids(results: &[Restaurant]) -> Vec<&str> {
        results.iter().map(|r| r.place_id.as_str()).collect()
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(derive(&[], &FilterState::default()).is_empty());

        let strict = FilterState {
            min_rating: 4.5,
            only_open: true,
            sort_by: SortBy::Name,
        };
        assert!(derive(&[], &strict).is_empty());
    }

    #[test]
    fn default_filters_keep_everything_sorted_by_distance() {
        let mut near = restaurant("near");
        near.distance_km = Some(0.4);
        let mut far = restaurant("far");
        far.distance_km = Some(7.2);
        let mut mid = restaurant("mid");
        mid.distance_km = Some(2.0);

        let results = derive(
            &[far.clone(), near.clone(), mid.clone()],
            &FilterState::default(),
        );
        assert_eq!(ids(&results), vec!["near", "mid", "far"]);
    }

    #[test]
    fn equal_distances_keep_their_original_order() {
        let mut first = restaurant("first");
        first.distance_km = Some(1.5);
        let mut second = restaurant("second");
        second.distance_km = Some(1.5);
        let mut third = restaurant("third");
        third.distance_km = Some(1.5);

        let input = [first, second, third];
        let results = derive(&input, &FilterState::default());
        assert_eq!(ids(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_distance_sorts_first() {
        let unknown = restaurant("unknown");
        let mut close = restaurant("close");
        close.distance_km = Some(0.1);

        let results = derive(&[close, unknown], &FilterState::default());
        assert_eq!(ids(&results), vec!["unknown", "close"]);
    }

    #[test]
    fn min_rating_keeps_only_restaurants_at_or_above_threshold() {
        let mut three = restaurant("three");
        three.rating = Some(3.0);
        let mut five = restaurant("five");
        five.rating = Some(5.0);
        let mut four = restaurant("four");
        four.rating = Some(4.0);

        let filters = FilterState {
            min_rating: 4.0,
            ..FilterState::default()
        };
        let results = derive(&[three, five, four], &filters);
        assert_eq!(ids(&results), vec!["five", "four"]);
    }

    #[test]
    fn positive_min_rating_excludes_unrated_restaurants() {
        let unrated = restaurant("unrated");
        let mut rated = restaurant("rated");
        rated.rating = Some(4.5);

        let filters = FilterState {
            min_rating: 1.0,
            ..FilterState::default()
        };
        let results = derive(&[unrated, rated], &filters);
        assert_eq!(ids(&results), vec!["rated"]);
    }

    #[test]
    fn only_open_excludes_closed_and_unknown() {
        let mut open = restaurant("open");
        open.is_open = Some(true);
        let mut closed = restaurant("closed");
        closed.is_open = Some(false);
        let unknown = restaurant("unknown");

        let filters = FilterState {
            only_open: true,
            ..FilterState::default()
        };
        let results = derive(&[closed, unknown, open], &filters);
        assert_eq!(ids(&results), vec!["open"]);
    }

    #[test]
    fn sort_by_rating_is_descending_with_unknown_as_zero() {
        let mut low = restaurant("low");
        low.rating = Some(2.1);
        let mut high = restaurant("high");
        high.rating = Some(4.8);
        let unrated = restaurant("unrated");

        let filters = FilterState {
            sort_by: SortBy::Rating,
            ..FilterState::default()
        };
        let results = derive(&[low, unrated, high], &filters);
        assert_eq!(ids(&results), vec!["high", "low", "unrated"]);
    }

    #[test]
    fn sort_by_review_count_is_descending() {
        let mut few = restaurant("few");
        few.review_count = Some(12);
        let mut many = restaurant("many");
        many.review_count = Some(941);
        let none = restaurant("none");

        let filters = FilterState {
            sort_by: SortBy::ReviewCount,
            ..FilterState::default()
        };
        let results = derive(&[few, none, many], &filters);
        assert_eq!(ids(&results), vec!["many", "few", "none"]);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let mut zum = restaurant("a");
        zum.name = "zum Adler".to_string();
        let mut bella = restaurant("b");
        bella.name = "Bella Italia".to_string();
        let mut augustiner = restaurant("c");
        augustiner.name = "Augustiner".to_string();

        let filters = FilterState {
            sort_by: SortBy::Name,
            ..FilterState::default()
        };
        let results = derive(&[zum, bella, augustiner], &filters);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Augustiner", "Bella Italia", "zum Adler"]);
    }

    #[test]
    fn deriving_twice_yields_identical_output() {
        let mut a = restaurant("a");
        a.distance_km = Some(3.3);
        a.rating = Some(4.0);
        let mut b = restaurant("b");
        b.distance_km = Some(1.1);
        let mut c = restaurant("c");
        c.distance_km = Some(3.3);

        let input = [a, b, c];
        let filters = FilterState::default();
        assert_eq!(derive(&input, &filters), derive(&input, &filters));
    }
}
