//! Nominatim (OpenStreetMap) geocoder over HTTP.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{GeocodeError, Geocoder};
use crate::error::Result;
use crate::models::GeoPoint;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/";

/// One entry of the `/search?format=json` response. Coordinates come back
/// as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
}

impl NominatimGeocoder {
    /// Nominatim's usage policy requires an identifying user agent.
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(endpoint)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Ok(Self {
            client: Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()?,
            search_url: base.join("search")?,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> std::result::Result<Option<GeoPoint>, GeocodeError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(GeocodeError::Unavailable(status.to_string()));
        }
        if !status.is_success() {
            return Err(GeocodeError::Rejected(status.to_string()));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(classify)?;
        let Some(place) = places.into_iter().next() else {
            debug!("Nominatim has no result for '{}'", query);
            return Ok(None);
        };

        debug!(
            "Nominatim resolved '{}' to {}",
            query,
            place.display_name.as_deref().unwrap_or("?")
        );
        parse_place(&place).map(Some)
    }
}

fn parse_place(place: &NominatimPlace) -> std::result::Result<GeoPoint, GeocodeError> {
    let lat = place.lat.trim().parse::<f64>();
    let lon = place.lon.trim().parse::<f64>();
    match (lat, lon) {
        (Ok(lat), Ok(lon)) => {
            GeoPoint::new(lat, lon).map_err(|e| GeocodeError::Rejected(e.to_string()))
        }
        _ => Err(GeocodeError::Rejected(format!(
            "unparsable coordinates ({}, {})",
            place.lat, place.lon
        ))),
    }
}

fn classify(e: reqwest::Error) -> GeocodeError {
    if e.is_timeout() {
        GeocodeError::Timeout
    } else if e.is_connect() || e.is_request() {
        GeocodeError::Unavailable(e.to_string())
    } else {
        GeocodeError::Rejected(e.to_string())
    }
}
