//! Query points taken from a transit stops dataset.

use tracing::{info, warn};

use super::filter::parse_point;
use super::RawTable;
use crate::error::Result;
use crate::models::{QueryKind, QueryPoint};

/// Turn every row of an (already filtered) transit table into a query point.
///
/// Rows without usable coordinates are skipped with a warning.
pub fn transit_stops(
    table: &RawTable,
    name_column: &str,
    lat_column: &str,
    lon_column: &str,
) -> Result<Vec<QueryPoint>> {
    let name_idx = table.column_index(name_column)?;
    let lat_idx = table.column_index(lat_column)?;
    let lon_idx = table.column_index(lon_column)?;

    let mut stops = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let name = table.cell(row, name_idx).trim();
        match parse_point(table.cell(row, lat_idx), table.cell(row, lon_idx)) {
            Some(point) => stops.push(QueryPoint::new(name, point, QueryKind::TransitStop)),
            None => warn!("Skipping transit stop '{}' in '{}': unusable coordinates", name, table.name()),
        }
    }

    info!("Using {} transit stops from '{}' as query points", stops.len(), table.name());
    Ok(stops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VicinoError;

    #[test]
    fn test_stops_from_rows() {
        let table = RawTable::from_reader(
            "rome",
            "stop_name,stop_lat,stop_lon\nTermini,41.9009,12.5018\nNowhere,abc,12.0\n".as_bytes(),
        )
        .unwrap();
        let stops = transit_stops(&table, "stop_name", "stop_lat", "stop_lon").unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "Termini");
        assert_eq!(stops[0].kind, QueryKind::TransitStop);
    }

    #[test]
    fn test_missing_column() {
        let table = RawTable::from_reader("rome", "stop_name,lat\nTermini,41.9\n".as_bytes()).unwrap();
        let err = transit_stops(&table, "stop_name", "lat", "lon").unwrap_err();
        assert!(matches!(err, VicinoError::Schema { .. }));
    }
}
