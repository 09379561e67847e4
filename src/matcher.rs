//! Nearest-facility matching.
//!
//! A plain linear scan over the eligible catalog: O(n) per query and O(q·n)
//! for a run. Catalogs of a few thousand facilities and a few dozen query
//! points stay well below a millisecond, so there is no spatial index; larger
//! catalogs would need one.

use tracing::debug;

use crate::distance::haversine_km;
use crate::models::{Facility, GeoPoint, MatchResult, QueryPoint};

/// Closest facility to a point. `facility` is `None` only for an empty catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub facility: Option<&'a Facility>,
    pub distance_km: f64,
}

/// Scan `catalog` in order and return the closest facility to `query`.
///
/// Ties go to the facility that comes first in the catalog.
pub fn nearest<'a>(query: &GeoPoint, catalog: &'a [Facility]) -> Nearest<'a> {
    let mut best = None;
    let mut min_distance = f64::INFINITY;

    for facility in catalog {
        let distance = haversine_km(query, &facility.point);
        if distance < min_distance {
            min_distance = distance;
            best = Some(facility);
        }
    }

    Nearest {
        facility: best,
        distance_km: min_distance,
    }
}

/// Match every query point against the same catalog, preserving query order.
pub fn match_all<'a>(queries: &[QueryPoint], catalog: &'a [Facility]) -> Vec<MatchResult<'a>> {
    queries
        .iter()
        .map(|query| {
            let found = nearest(&query.point, catalog);
            match found.facility {
                Some(f) => debug!(
                    "{} {}: nearest is {} (id {}) at {:.3} km",
                    query.kind, query.name, f.name, f.id, found.distance_km
                ),
                None => debug!("{} {}: no facility to match", query.kind, query.name),
            }
            MatchResult {
                query: query.clone(),
                facility: found.facility,
                distance_km: found.distance_km,
            }
        })
        .collect()
}
