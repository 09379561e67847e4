//! Resolution of named query points into coordinates.
//!
//! The geocoding service itself sits behind the [`Geocoder`] trait; this
//! module adds the retry policy, rate limiting and caching around it.

mod limiter;
mod nominatim;
mod source;

pub use limiter::RateLimiter;
pub use nominatim::{NominatimGeocoder, DEFAULT_ENDPOINT};
pub use source::{GeocodeCache, QuerySource, ResolvedQueries};

use thiserror::Error;

use crate::models::GeoPoint;

/// Why a single lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("geocoder timed out")]
    Timeout,

    /// Service temporarily unavailable (connection refused, 5xx, throttled)
    #[error("geocoder unavailable: {0}")]
    Unavailable(String),

    /// The request or response was unusable; retrying will not help
    #[error("geocoder rejected request: {0}")]
    Rejected(String),
}

impl GeocodeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, GeocodeError::Timeout | GeocodeError::Unavailable(_))
    }
}

/// A named point that could not be resolved, even after retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to get coordinates for {name}: {reason}")]
pub struct GeocodeFailure {
    pub name: String,
    pub reason: String,
}

/// External geocoding service.
///
/// `Ok(None)` means the service answered and knows no such place.
pub trait Geocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

impl<G: Geocoder> Geocoder for &G {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        (**self).geocode(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GeocodeError::Timeout.is_transient());
        assert!(GeocodeError::Unavailable("503".into()).is_transient());
        assert!(!GeocodeError::Rejected("400".into()).is_transient());
    }

    #[test]
    fn test_failure_message() {
        let failure = GeocodeFailure {
            name: "Balduina".to_string(),
            reason: "no result".to_string(),
        };
        assert_eq!(failure.to_string(), "failed to get coordinates for Balduina: no result");
    }
}
