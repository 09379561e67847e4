//! Error types for the matching pipeline.

use thiserror::Error;

/// Result type alias for vicino operations.
pub type Result<T> = std::result::Result<T, VicinoError>;

/// Errors that can occur while loading, filtering or matching.
///
/// Geocoding failures are not errors at this level: they are collected in
/// [`crate::geocode::ResolvedQueries`] and the run continues.
#[derive(Debug, Error)]
pub enum VicinoError {
    /// A dataset is missing a column the pipeline needs
    #[error("dataset '{dataset}' has no column '{column}'")]
    Schema { dataset: String, column: String },

    /// Coordinates outside the valid range
    #[error("invalid coordinate: {0}")]
    Validation(String),

    /// A cell that must parse (e.g. a facility identifier) did not
    #[error("dataset '{dataset}' row {row}: cannot parse '{value}' in column '{column}'")]
    InvalidValue {
        dataset: String,
        column: String,
        row: usize,
        value: String,
    },

    /// Nothing survived catalog filtering
    #[error("eligible catalog is empty")]
    EmptyCatalog,

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("invalid config")]
    Config(#[from] toml::de::Error),

    #[error("invalid URL")]
    Url(#[from] url::ParseError),
}

impl VicinoError {
    pub(crate) fn schema(dataset: &str, column: &str) -> Self {
        VicinoError::Schema {
            dataset: dataset.to_string(),
            column: column.to_string(),
        }
    }
}
