//! Standalone Leaflet page for map layers.

use super::{escape_html, feature_collection, MapLayers};
use crate::config::MapConfig;

const LEAFLET_VERSION: &str = "1.9.4";

/// Render a self-contained HTML page. The view starts at the configured
/// center and zoom and then fits all markers when there are at least two.
pub fn render_html(layers: &MapLayers, title: &str, style: &MapConfig) -> String {
    let data = serde_json::to_string(&feature_collection(layers))
        .unwrap_or_else(|_| "{\"type\":\"FeatureCollection\",\"features\":[]}".to_string())
        // keep a stray "</script>" in a name from closing the tag
        .replace("</", "<\\/");

    let fit_bounds = match layers.bounds() {
        Some(rect) if layers.markers.len() > 1 => format!(
            "map.fitBounds([[{}, {}], [{}, {}]], {{ padding: [30, 30] }});",
            rect.min().y,
            rect.min().x,
            rect.max().y,
            rect.max().x
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const data = {data};
const map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
L.geoJSON(data, {{
  pointToLayer: (feature, latlng) => L.circleMarker(latlng, {{
    radius: 8,
    color: feature.properties.color,
    fillColor: feature.properties.color,
    fillOpacity: 0.8
  }}),
  style: (feature) => feature.geometry.type === 'LineString'
    ? {{ color: feature.properties.color, weight: feature.properties.weight, opacity: feature.properties.opacity, dashArray: '6 6' }}
    : {{}},
  onEachFeature: (feature, layer) => {{
    if (feature.properties.popup) layer.bindPopup(feature.properties.popup);
  }}
}}).addTo(map);
{fit_bounds}
</script>
</body>
</html>
"#,
        title = escape_html(title),
        version = LEAFLET_VERSION,
        data = data,
        lat = style.center_lat,
        lon = style.center_lon,
        zoom = style.zoom,
        fit_bounds = fit_bounds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Facility, GeoPoint, QueryKind, QueryPoint};
    use crate::matcher::match_all;
    use crate::map::{Marker, MarkerRole};

    #[test]
    fn test_page_contains_view_and_data() {
        let catalog = vec![Facility::new(
            1,
            "</script><b>x</b>",
            GeoPoint::new(41.9067, 12.5117).unwrap(),
        )];
        let queries = vec![QueryPoint::new(
            "Termini",
            GeoPoint::new(41.9009, 12.5018).unwrap(),
            QueryKind::Station,
        )];
        let matches = match_all(&queries, &catalog);
        let layers = MapLayers::from_matches(&matches, &MapConfig::default());

        let page = render_html(&layers, "Rome & hospitals", &MapConfig::default());
        assert!(page.contains("<title>Rome &amp; hospitals</title>"));
        assert!(page.contains("setView([41.895266, 12.482324], 12)"));
        assert!(page.contains("map.fitBounds("));
        assert!(page.contains("Termini"));
        assert!(!page.contains("</script><b>"));
    }

    #[test]
    fn test_single_marker_keeps_configured_view() {
        let layers = MapLayers {
            markers: vec![Marker {
                label: "Termini".to_string(),
                point: GeoPoint::new(41.9009, 12.5018).unwrap(),
                color: "blue".to_string(),
                role: MarkerRole::Query,
                popup: "Termini".to_string(),
            }],
            connectors: Vec::new(),
            unmatched: vec!["Termini".to_string()],
        };

        let page = render_html(&layers, "one", &MapConfig::default());
        assert!(page.contains("setView([41.895266, 12.482324], 12)"));
        assert!(!page.contains("fitBounds"));
    }

    #[test]
    fn test_empty_layers_render() {
        let page = render_html(&MapLayers::default(), "empty", &MapConfig::default());
        assert!(page.contains("\"features\":[]"));
        assert!(!page.contains("fitBounds"));
    }
}
