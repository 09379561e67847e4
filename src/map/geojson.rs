//! GeoJSON export of map layers.

use chrono::Utc;
use serde_json::{json, Value};

use super::MapLayers;
use crate::models::GeoPoint;

fn position(p: &GeoPoint) -> Value {
    // GeoJSON positions are [lon, lat]
    json!([p.lon(), p.lat()])
}

/// Markers become `Point` features and connectors `LineString` features,
/// in layer order.
pub fn feature_collection(layers: &MapLayers) -> Value {
    let markers = layers.markers.iter().map(|m| {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": position(&m.point) },
            "properties": {
                "label": m.label,
                "role": m.role,
                "color": m.color,
                "popup": m.popup,
            }
        })
    });

    let connectors = layers.connectors.iter().map(|c| {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [position(&c.from), position(&c.to)],
            },
            "properties": {
                "role": "connector",
                "query": c.query,
                "facility": c.facility,
                "distance_km": c.distance_km,
                "color": c.color,
                "weight": c.weight,
                "opacity": c.opacity,
            }
        })
    });

    json!({
        "type": "FeatureCollection",
        "generated_at": Utc::now().to_rfc3339(),
        "unmatched": layers.unmatched,
        "features": markers.chain(connectors).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::matcher::match_all;
    use crate::models::{Facility, QueryKind, QueryPoint};

    #[test]
    fn test_feature_collection_shape() {
        let catalog = vec![Facility::new(
            7,
            "San Camillo",
            GeoPoint::new(41.8710, 12.4553).unwrap(),
        )];
        let queries = vec![QueryPoint::new(
            "Trastevere",
            GeoPoint::new(41.8848, 12.4660).unwrap(),
            QueryKind::Station,
        )];
        let matches = match_all(&queries, &catalog);
        let layers = MapLayers::from_matches(&matches, &MapConfig::default());

        let fc = feature_collection(&layers);
        assert_eq!(fc["type"], "FeatureCollection");

        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([12.4660, 41.8848]));
        assert_eq!(features[0]["properties"]["role"], "query");
        assert_eq!(features[1]["properties"]["role"], "facility");
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(features[2]["properties"]["facility"], "San Camillo");
    }
}
