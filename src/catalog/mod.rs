//! Facility catalog: raw dataset loading and eligibility filtering.

mod filter;
mod table;
mod transit;

pub use filter::{Catalog, CatalogFilter, FilterStats, RowFilter};
pub use table::{download_client, DatasetSource, RawTable, DOWNLOAD_TIMEOUT};
pub use transit::transit_stops;
