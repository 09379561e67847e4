//! Map presentation of match results.
//!
//! [`MapLayers`] is the hand-off to any renderer: ordered markers and
//! connector segments. GeoJSON and a standalone Leaflet page are provided.

mod geojson;
mod html;

pub use geojson::feature_collection;
pub use html::render_html;

use geo::{BoundingRect, MultiPoint, Rect};
use serde::Serialize;
use tracing::warn;

use crate::config::MapConfig;
use crate::models::{GeoPoint, MatchResult};

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    Query,
    Facility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub point: GeoPoint,
    pub color: String,
    pub role: MarkerRole,
    /// HTML snippet shown when the marker is clicked
    pub popup: String,
}

/// Line from a query point to its matched facility
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub query: String,
    pub facility: String,
    pub distance_km: f64,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapLayers {
    pub markers: Vec<Marker>,
    pub connectors: Vec<Connector>,
    /// Query points that had nothing to connect to
    pub unmatched: Vec<String>,
}

impl MapLayers {
    /// One marker per query point, one per matched facility, and a
    /// connector between them. Unmatched points only get their own marker.
    pub fn from_matches(matches: &[MatchResult<'_>], style: &MapConfig) -> Self {
        let mut layers = MapLayers::default();

        for m in matches {
            let query = &m.query;
            layers.markers.push(Marker {
                label: query.name.clone(),
                point: query.point,
                color: style.station_color.clone(),
                role: MarkerRole::Query,
                popup: escape_html(&query.name),
            });

            let Some((facility, distance_km)) = m.matched() else {
                warn!(
                    "No facility matched for {}, skipping its connector",
                    query.name
                );
                layers.unmatched.push(query.name.clone());
                continue;
            };

            layers.markers.push(Marker {
                label: facility.name.clone(),
                point: facility.point,
                color: style.facility_color.clone(),
                role: MarkerRole::Facility,
                popup: format!(
                    "Nearest hospital: {}<br>Distance: {:.2} km",
                    escape_html(&facility.name),
                    distance_km
                ),
            });
            layers.connectors.push(Connector {
                from: query.point,
                to: facility.point,
                query: query.name.clone(),
                facility: facility.name.clone(),
                distance_km,
                color: style.connector_color.clone(),
                weight: style.connector_weight,
                opacity: style.connector_opacity,
            });
        }

        layers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Bounding rectangle of all markers (x = lon, y = lat)
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let points: MultiPoint<f64> = self
            .markers
            .iter()
            .map(|m| geo::Point::from(m.point))
            .collect();
        points.bounding_rect()
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_all;
    use crate::models::{Facility, QueryKind, QueryPoint};

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn queries() -> Vec<QueryPoint> {
        vec![
            QueryPoint::new("Termini", p(41.9009, 12.5018), QueryKind::Station),
            QueryPoint::new("Ostiense", p(41.8717, 12.4862), QueryKind::Station),
        ]
    }

    #[test]
    fn test_layers_for_matches() {
        let catalog = vec![Facility::new(1, "Policlinico <Umberto I>", p(41.9067, 12.5117))];
        let matches = match_all(&queries(), &catalog);
        let layers = MapLayers::from_matches(&matches, &MapConfig::default());

        assert_eq!(layers.markers.len(), 4);
        assert_eq!(layers.connectors.len(), 2);
        assert!(layers.unmatched.is_empty());

        assert_eq!(layers.markers[0].role, MarkerRole::Query);
        assert_eq!(layers.markers[0].color, "blue");
        assert_eq!(layers.markers[1].role, MarkerRole::Facility);
        assert_eq!(layers.markers[1].color, "red");
        assert!(layers.markers[1]
            .popup
            .starts_with("Nearest hospital: Policlinico &lt;Umberto I&gt;<br>Distance: "));
        assert!(layers.markers[1].popup.ends_with(" km"));

        let c = &layers.connectors[0];
        assert_eq!(c.from, p(41.9009, 12.5018));
        assert_eq!(c.to, p(41.9067, 12.5117));
        assert_eq!(c.weight, 2.0);
        assert_eq!(c.opacity, 0.5);
    }

    #[test]
    fn test_empty_catalog_skips_connectors() {
        let matches = match_all(&queries(), &[]);
        let layers = MapLayers::from_matches(&matches, &MapConfig::default());

        assert_eq!(layers.markers.len(), 2);
        assert!(layers.markers.iter().all(|m| m.role == MarkerRole::Query));
        assert!(layers.connectors.is_empty());
        assert_eq!(layers.unmatched, vec!["Termini", "Ostiense"]);
    }

    #[test]
    fn test_bounds() {
        let matches = match_all(&queries(), &[]);
        let layers = MapLayers::from_matches(&matches, &MapConfig::default());
        let rect = layers.bounds().unwrap();
        assert_eq!(rect.min().x, 12.4862);
        assert_eq!(rect.max().y, 41.9009);

        assert!(MapLayers::default().bounds().is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A & B <C>"), "A &amp; B &lt;C&gt;");
    }
}
