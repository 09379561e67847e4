//! Run configuration, loaded from TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::catalog::{transit_stops, CatalogFilter, DatasetSource, RowFilter};
use crate::error::Result;
use crate::geocode::NominatimGeocoder;
use crate::models::QueryPoint;
use crate::retry::RetryPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub transit: Option<TransitConfig>,
    #[serde(default)]
    pub stations: StationsConfig,
    #[serde(default)]
    pub points: Vec<PointConfig>,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// URL or path of the facility CSV
    pub source: String,
    pub id_column: String,
    pub name_column: String,
    #[serde(default = "default_lat_column")]
    pub lat_column: String,
    #[serde(default = "default_lon_column")]
    pub lon_column: String,
    #[serde(default)]
    pub drop_columns: Vec<String>,
    #[serde(default)]
    pub exclude_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransitConfig {
    pub source: String,
    pub filter: Option<RowFilter>,
    /// Match every remaining stop as well (needs the three columns below)
    #[serde(default)]
    pub as_queries: bool,
    pub name_column: Option<String>,
    pub lat_column: Option<String>,
    pub lon_column: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StationsConfig {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub query_suffix: String,
}

/// Reference point with literal coordinates
#[derive(Debug, Deserialize, Clone)]
pub struct PointConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_one_second")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_one_second")]
    pub min_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_station_color")]
    pub station_color: String,
    #[serde(default = "default_facility_color")]
    pub facility_color: String,
    #[serde(default = "default_facility_color")]
    pub connector_color: String,
    #[serde(default = "default_connector_weight")]
    pub connector_weight: f64,
    #[serde(default = "default_connector_opacity")]
    pub connector_opacity: f64,
}

fn default_lat_column() -> String {
    "lat".to_string()
}
fn default_lon_column() -> String {
    "lon".to_string()
}
fn default_endpoint() -> String {
    crate::geocode::DEFAULT_ENDPOINT.to_string()
}
fn default_user_agent() -> String {
    "vicino/0.1 (nearest facility finder)".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_attempts() -> u32 {
    3
}
fn default_one_second() -> u64 {
    1000
}
fn default_center_lat() -> f64 {
    41.895266
}
fn default_center_lon() -> f64 {
    12.482324
}
fn default_zoom() -> u8 {
    12
}
fn default_station_color() -> String {
    "blue".to_string()
}
fn default_facility_color() -> String {
    "red".to_string()
}
fn default_connector_weight() -> f64 {
    2.0
}
fn default_connector_opacity() -> f64 {
    0.5
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            attempts: default_attempts(),
            retry_delay_ms: default_one_second(),
            min_interval_ms: default_one_second(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
            station_color: default_station_color(),
            facility_color: default_facility_color(),
            connector_color: default_facility_color(),
            connector_weight: default_connector_weight(),
            connector_opacity: default_connector_opacity(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Static reference points, validated. An out-of-range literal is fatal.
    pub fn reference_points(&self) -> Result<Vec<QueryPoint>> {
        self.points
            .iter()
            .map(|p| QueryPoint::reference(&p.name, p.lat, p.lon))
            .collect()
    }
}

impl CatalogConfig {
    pub fn source(&self) -> DatasetSource {
        DatasetSource::parse(&self.source)
    }

    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter::new(&self.id_column, &self.name_column, &self.lat_column, &self.lon_column)
            .with_drop_columns(self.drop_columns.iter().cloned())
            .with_exclude_ids(self.exclude_ids.iter().copied())
    }
}

impl TransitConfig {
    pub fn source(&self) -> DatasetSource {
        DatasetSource::parse(&self.source)
    }

    /// Name, lat and lon columns when the stops are used as query points
    pub fn query_columns(&self) -> Option<(&str, &str, &str)> {
        if !self.as_queries {
            return None;
        }
        Some((
            self.name_column.as_deref()?,
            self.lat_column.as_deref()?,
            self.lon_column.as_deref()?,
        ))
    }

    /// Load, filter and convert the transit table into query points.
    ///
    /// The dataset is only fetched when the stops are used as queries.
    pub async fn load_query_points(
        &self,
        client: &Client,
        policy: &RetryPolicy,
    ) -> Result<Vec<QueryPoint>> {
        let Some((name, lat, lon)) = self.query_columns() else {
            info!("Transit stops are not used as query points, skipping {}", self.source);
            return Ok(Vec::new());
        };

        let table = self.source().load("transit", client, policy).await?;
        let table = match &self.filter {
            Some(filter) => filter.apply(&table)?,
            None => table,
        };
        info!("Transit dataset: {} rows after filtering", table.len());

        transit_stops(&table, name, lat, lon)
    }
}

impl GeocoderConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn build(&self) -> Result<NominatimGeocoder> {
        NominatimGeocoder::new(
            &self.endpoint,
            &self.user_agent,
            Duration::from_secs(self.timeout_secs),
        )
    }
}
