//! Core data models for the matching pipeline.

pub mod facility;
pub mod point;

pub use facility::{Facility, MatchResult};
pub use point::{GeoPoint, QueryKind, QueryPoint};
