use carpool_providers::coordinate::Coordinate;
use thiserror::Error;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate {lat},{lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

fn validate(coordinate: &Coordinate) -> Result<(), GeoError> {
    if coordinate.is_valid() {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate {
            lat: coordinate.lat(),
            lon: coordinate.lon(),
        })
    }
}

/// Great-circle distance in kilometers between two coordinates (haversine).
pub fn try_aerial_distance(a: &Coordinate, b: &Coordinate) -> Result<f64, GeoError> {
    validate(a)?;
    validate(b)?;

    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h slightly above 1 for antipodal points
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

/// Same as [`try_aerial_distance`] but returns `f64::INFINITY` for invalid
/// input, which callers treat as an unusable candidate.
pub fn aerial_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    try_aerial_distance(a, b).unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_for_identical_points() {
        let point = Coordinate::new(12.9716, 77.5946);
        assert_eq!(aerial_distance(&point, &point), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (Coordinate::new(12.9716, 77.5946), Coordinate::new(13.0827, 80.2707)),
            (Coordinate::new(-33.8688, 151.2093), Coordinate::new(51.5074, -0.1278)),
            (Coordinate::new(0.0, 179.9), Coordinate::new(0.0, -179.9)),
        ];

        for (a, b) in pairs {
            assert_eq!(aerial_distance(&a, &b), aerial_distance(&b, &a));
        }
    }

    #[test]
    fn test_known_distances() {
        // One degree of latitude on a 6371 km sphere
        let one_degree = aerial_distance(&Coordinate::new(0.0, 0.0), &Coordinate::new(1.0, 0.0));
        assert!((one_degree - 111.194_926_6).abs() < 1e-6);

        // Bangalore to Chennai, roughly 290 km
        let distance = aerial_distance(
            &Coordinate::new(12.9716, 77.5946),
            &Coordinate::new(13.0827, 80.2707),
        );
        assert!(distance > 285.0 && distance < 295.0);

        let antipodal = aerial_distance(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 180.0));
        assert!((antipodal - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_input_is_infinite() {
        let valid = Coordinate::new(12.0, 77.0);

        assert_eq!(
            aerial_distance(&Coordinate::new(f64::NAN, 77.0), &valid),
            f64::INFINITY
        );
        assert_eq!(
            aerial_distance(&valid, &Coordinate::new(12.0, f64::INFINITY)),
            f64::INFINITY
        );
        assert_eq!(
            try_aerial_distance(&Coordinate::new(95.0, 0.0), &valid),
            Err(GeoError::InvalidCoordinate { lat: 95.0, lon: 0.0 })
        );
    }

    #[test]
    fn test_non_negative_and_finite_for_valid_input() {
        let points = [
            Coordinate::new(-90.0, -180.0),
            Coordinate::new(90.0, 180.0),
            Coordinate::new(45.0, 0.0),
            Coordinate::new(-12.5, 100.25),
        ];

        for a in &points {
            for b in &points {
                let distance = aerial_distance(a, b);
                assert!(distance.is_finite());
                assert!(distance >= 0.0);
            }
        }
    }
}
