//! Haversine distance calculation.
//!
//! Great-circle distance on a sphere of fixed radius. No ellipsoidal
//! correction is applied.

use crate::models::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Largest possible distance (antipodal points), in kilometers.
pub const MAX_DISTANCE_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

/// Great-circle distance between two points in kilometers.
///
/// ```
/// use vicino::{haversine_km, GeoPoint};
///
/// let termini = GeoPoint::new(41.9016577, 12.5007858).unwrap();
/// let tiburtina = GeoPoint::new(41.9332728, 12.6014069).unwrap();
///
/// let d = haversine_km(&termini, &tiburtina);
/// assert!((d - 9.0).abs() < 0.5);
/// ```
#[inline]
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.lat().to_radians();
    let lat_b = b.lat().to_radians();
    let d_lat = lat_b - lat_a;
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h slightly outside [0, 1] near antipodes
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_same_point_zero_distance() {
        for a in [p(41.9016577, 12.5007858), p(0.0, 0.0), p(90.0, 0.0), p(-33.9, 151.2)] {
            assert!(haversine_km(&a, &a).abs() < 1e-9);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (p(41.9016577, 12.5007858), p(41.7568, 12.2911)),
            (p(52.52, 13.405), p(48.8566, 2.3522)),
            (p(-45.0, 179.9), p(45.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert_eq!(haversine_km(&a, &b), haversine_km(&b, &a));
        }
    }

    #[test]
    fn test_pole_to_pole() {
        let d = haversine_km(&GeoPoint::NORTH_POLE, &GeoPoint::SOUTH_POLE);
        assert!((d - 20015.09).abs() < 0.1, "pole to pole: {}", d);
        assert!((d - MAX_DISTANCE_KM).abs() < 1e-6);
    }

    #[test]
    fn test_berlin_to_paris() {
        let d = haversine_km(&p(52.5200, 13.4050), &p(48.8566, 2.3522));
        // Expected: ~878 km
        assert!((d - 878.0).abs() < 5.0, "Berlin-Paris: {}", d);
    }

    #[test]
    fn test_antimeridian_and_poles_are_finite() {
        let cases = [
            (p(0.0, 180.0), p(0.0, -180.0)),
            (p(0.0, 0.0), p(0.0, 180.0)),
            (p(90.0, 45.0), p(90.0, -135.0)),
            (p(-90.0, 180.0), p(90.0, -180.0)),
            (p(10.0, 179.999999), p(-10.0, -0.000001)),
        ];
        for (a, b) in cases {
            let d = haversine_km(&a, &b);
            assert!(d.is_finite(), "{} -> {} gave {}", a, b, d);
            assert!((0.0..=MAX_DISTANCE_KM + 1e-9).contains(&d));
        }
        // ±180 is the same meridian
        assert!(haversine_km(&p(0.0, 180.0), &p(0.0, -180.0)) < 1e-9);
    }

    #[test]
    fn test_method_matches_function() {
        let a = p(41.9016577, 12.5007858);
        let b = p(41.9020, 12.5010);
        assert_eq!(a.distance_to(&b), haversine_km(&a, &b));
        assert!(a.distance_to(&b) < 1.0);
    }
}
