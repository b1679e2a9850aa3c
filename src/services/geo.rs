use crate::models::restaurant::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two coordinates, via the
/// haversine formula. Returns the raw value; rounding happens only where a
/// distance is stored for display (see [`round_to_tenth`]).
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn round_to_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: Coordinates = Coordinates {
        lat: 52.52,
        lng: 13.405,
    };
    const MUNICH: Coordinates = Coordinates {
        lat: 48.137,
        lng: 11.575,
    };

    #[test]
    fn identical_points_are_zero_kilometers_apart() {
        assert_eq!(distance_km(BERLIN, BERLIN), 0.0);
        assert_eq!(distance_km(MUNICH, MUNICH), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(distance_km(BERLIN, MUNICH), distance_km(MUNICH, BERLIN));
    }

    #[test]
    fn berlin_to_munich_matches_reference_within_one_percent() {
        let reference = 504.0;
        let computed = distance_km(BERLIN, MUNICH);
        assert!(
            (computed - reference).abs() / reference < 0.01,
            "computed {computed} km, reference {reference} km"
        );
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let a = Coordinates { lat: 0.0, lng: 0.0 };
        let b = Coordinates { lat: 0.0, lng: 1.0 };
        let computed = distance_km(a, b);
        assert!((computed - 111.195).abs() < 0.1, "computed {computed} km");
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_to_tenth(1.2499), 1.2);
        assert_eq!(round_to_tenth(1.25), 1.3);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }
}
