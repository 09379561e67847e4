//! Query point resolution: geocoded stations with retry, rate limiting and
//! a caller-owned cache.

use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info, warn};

use super::{GeocodeError, GeocodeFailure, Geocoder, RateLimiter};
use crate::models::{GeoPoint, QueryKind, QueryPoint};
use crate::retry::{retry, RetryPolicy};

/// Name → coordinates of places already resolved. Owned by the caller so
/// that it can be reused across runs or pre-seeded.
pub type GeocodeCache = HashMap<String, GeoPoint>;

/// Outcome of resolving a list of names: usable points plus the names that
/// must be reported as failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedQueries {
    pub points: Vec<QueryPoint>,
    pub failures: Vec<GeocodeFailure>,
}

pub struct QuerySource<G> {
    geocoder: G,
    policy: RetryPolicy,
    limiter: RateLimiter,
    query_suffix: String,
}

impl<G: Geocoder> QuerySource<G> {
    pub fn new(geocoder: G, policy: RetryPolicy, min_interval: Duration) -> Self {
        Self {
            geocoder,
            policy,
            limiter: RateLimiter::new(min_interval),
            query_suffix: String::new(),
        }
    }

    /// Text appended to every name before lookup (e.g. `", Rome, Italy"`)
    pub fn with_query_suffix(mut self, suffix: &str) -> Self {
        self.query_suffix = suffix.to_string();
        self
    }

    /// Resolve one station name, consulting and filling `cache`.
    pub async fn resolve(
        &mut self,
        name: &str,
        cache: &mut GeocodeCache,
    ) -> Result<GeoPoint, GeocodeFailure> {
        if let Some(point) = cache.get(name) {
            debug!("Cache hit for geocode: {}", name);
            return Ok(*point);
        }

        self.limiter.acquire().await;

        let query = format!("{}{}", name, self.query_suffix);
        let geocoder = &self.geocoder;
        let outcome = retry(&self.policy, GeocodeError::is_transient, |attempt| {
            debug!("Geocoding '{}' (attempt {})", query, attempt);
            geocoder.geocode(&query)
        })
        .await;

        match outcome {
            Ok(Some(point)) => {
                cache.insert(name.to_string(), point);
                Ok(point)
            }
            Ok(None) => Err(GeocodeFailure {
                name: name.to_string(),
                reason: "no result".to_string(),
            }),
            Err(e) => Err(GeocodeFailure {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Resolve every station in order. Failures are collected and logged,
    /// never fatal; a name listed twice is resolved once.
    pub async fn resolve_stations<S: AsRef<str>>(
        &mut self,
        names: &[S],
        cache: &mut GeocodeCache,
    ) -> ResolvedQueries {
        let mut resolved = ResolvedQueries::default();
        let mut seen = HashSet::new();

        for name in names {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                continue;
            }

            match self.resolve(name, cache).await {
                Ok(point) => {
                    info!("{}: {}", name, point);
                    resolved
                        .points
                        .push(QueryPoint::new(name, point, QueryKind::Station));
                }
                Err(failure) => {
                    warn!("{}", failure);
                    resolved.failures.push(failure);
                }
            }
        }

        resolved
    }
}
