//! Catalog facilities and match results.

use serde::Serialize;

use super::{GeoPoint, QueryPoint};

/// A row of the eligible catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    /// Identifier, unique within the source dataset
    pub id: i64,

    /// Display name
    pub name: String,

    pub point: GeoPoint,
}

impl Facility {
    pub fn new(id: i64, name: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            id,
            name: name.into(),
            point,
        }
    }
}

/// Outcome of one query against the shared catalog.
///
/// `facility` borrows from the catalog, which outlives every result. When it
/// is `None` the catalog was empty and `distance_km` is infinite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub query: QueryPoint,
    pub facility: Option<&'a Facility>,
    pub distance_km: f64,
}

impl<'a> MatchResult<'a> {
    pub fn is_match(&self) -> bool {
        self.facility.is_some()
    }

    /// Matched facility together with its distance
    pub fn matched(&self) -> Option<(&'a Facility, f64)> {
        self.facility.map(|f| (f, self.distance_km))
    }
}
