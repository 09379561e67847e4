//! Vicino - nearest facility finder
//!
//! Matches named points of interest (stations, reference coordinates) to the
//! closest facility of a catalog by great-circle distance, and prepares the
//! matches for display on a map.

pub mod catalog;
pub mod config;
pub mod distance;
pub mod error;
pub mod geocode;
pub mod map;
pub mod matcher;
pub mod models;
pub mod retry;

pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use error::{Result, VicinoError};
pub use matcher::{match_all, nearest, Nearest};
pub use models::{Facility, GeoPoint, MatchResult, QueryKind, QueryPoint};
