//! Geographic points and named query points.

use serde::{Deserialize, Serialize};

use crate::distance::haversine_km;
use crate::error::{Result, VicinoError};

/// Geographic point (lat/lon, degrees).
///
/// Always holds finite coordinates with `lat` in [-90, 90] and `lon` in
/// [-180, 180]; the only way to build one is through [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLon")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

impl TryFrom<LatLon> for GeoPoint {
    type Error = VicinoError;

    fn try_from(raw: LatLon) -> Result<Self> {
        GeoPoint::new(raw.lat, raw.lon)
    }
}

impl GeoPoint {
    pub const NORTH_POLE: GeoPoint = GeoPoint { lat: 90.0, lon: 0.0 };
    pub const SOUTH_POLE: GeoPoint = GeoPoint { lat: -90.0, lon: 0.0 };

    /// Validate and build a point.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(VicinoError::Validation(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(VicinoError::Validation(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in kilometers
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo_types::Point::new(p.lon, p.lat)
    }
}

/// Where a query point came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Railway station resolved through the geocoder
    Station,
    /// Fixed reference point with literal coordinates from the config
    Reference,
    /// Stop taken from the transit dataset
    TransitStop,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Station => write!(f, "station"),
            QueryKind::Reference => write!(f, "reference"),
            QueryKind::TransitStop => write!(f, "transit_stop"),
        }
    }
}

/// A named location for which the nearest facility is sought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub name: String,
    pub point: GeoPoint,
    pub kind: QueryKind,
}

impl QueryPoint {
    pub fn new(name: impl Into<String>, point: GeoPoint, kind: QueryKind) -> Self {
        Self {
            name: name.into(),
            point,
            kind,
        }
    }

    /// Static reference point from literal coordinates
    pub fn reference(name: impl Into<String>, lat: f64, lon: f64) -> Result<Self> {
        Ok(Self::new(name, GeoPoint::new(lat, lon)?, QueryKind::Reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let p = GeoPoint::new(41.9016577, 12.5007858).unwrap();
        assert_eq!(p.lat(), 41.9016577);
        assert_eq!(p.lon(), 12.5007858);
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            GeoPoint::new(90.5, 0.0),
            Err(VicinoError::Validation(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -180.1),
            Err(VicinoError::Validation(_))
        ));
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: GeoPoint = serde_json::from_str(r#"{"lat": 41.9, "lon": 12.5}"#).unwrap();
        assert_eq!(ok, GeoPoint::new(41.9, 12.5).unwrap());

        let bad = serde_json::from_str::<GeoPoint>(r#"{"lat": 141.9, "lon": 12.5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_geo_point_axis_order() {
        let p: geo_types::Point<f64> = GeoPoint::new(41.9, 12.5).unwrap().into();
        assert_eq!(p.x(), 12.5);
        assert_eq!(p.y(), 41.9);
    }
}
