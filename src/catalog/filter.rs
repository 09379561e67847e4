//! Reduction of a raw facility table to the eligible catalog.

use hashbrown::HashSet;
use serde::Deserialize;
use tracing::{info, warn};

use super::RawTable;
use crate::error::{Result, VicinoError};
use crate::models::{Facility, GeoPoint};

/// Column names and exclusion rules for the facility dataset.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    pub id_column: String,
    pub name_column: String,
    pub lat_column: String,
    pub lon_column: String,
    /// Metadata columns projected out before matching
    pub drop_columns: Vec<String>,
    /// Identifiers of rows known to be invalid or duplicated in the source
    pub exclude_ids: HashSet<i64>,
}

/// Counters reported by [`CatalogFilter::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub input_rows: usize,
    pub excluded: usize,
    pub missing_coordinates: usize,
    pub eligible: usize,
}

/// The eligible catalog: read-only for the rest of the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    facilities: Vec<Facility>,
    stats: FilterStats,
}

impl Catalog {
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    /// The catalog, or `EmptyCatalog` when nothing survived filtering
    pub fn require_non_empty(&self) -> Result<&[Facility]> {
        if self.facilities.is_empty() {
            return Err(VicinoError::EmptyCatalog);
        }
        Ok(&self.facilities)
    }
}

impl CatalogFilter {
    pub fn new(id_column: &str, name_column: &str, lat_column: &str, lon_column: &str) -> Self {
        Self {
            id_column: id_column.to_string(),
            name_column: name_column.to_string(),
            lat_column: lat_column.to_string(),
            lon_column: lon_column.to_string(),
            drop_columns: Vec::new(),
            exclude_ids: HashSet::new(),
        }
    }

    pub fn with_drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_ids<I: IntoIterator<Item = i64>>(mut self, ids: I) -> Self {
        self.exclude_ids = ids.into_iter().collect();
        self
    }

    /// Build the eligible catalog from `raw`. The raw table is not modified.
    pub fn apply(&self, raw: &RawTable) -> Result<Catalog> {
        let table = raw.drop_columns(&self.drop_columns)?;
        let dataset = table.name();

        let id_idx = table.column_index(&self.id_column)?;
        let name_idx = table.column_index(&self.name_column)?;
        let lat_idx = table.column_index(&self.lat_column)?;
        let lon_idx = table.column_index(&self.lon_column)?;

        let mut stats = FilterStats {
            input_rows: table.len(),
            ..Default::default()
        };
        let mut facilities = Vec::with_capacity(table.len());

        for row in 0..table.len() {
            let id = parse_id(table.cell(row, id_idx)).ok_or_else(|| VicinoError::InvalidValue {
                dataset: dataset.to_string(),
                column: self.id_column.clone(),
                row,
                value: table.cell(row, id_idx).to_string(),
            })?;

            if self.exclude_ids.contains(&id) {
                stats.excluded += 1;
                continue;
            }

            match parse_point(table.cell(row, lat_idx), table.cell(row, lon_idx)) {
                Some(point) => {
                    facilities.push(Facility::new(id, table.cell(row, name_idx).trim(), point))
                }
                None => {
                    warn!(
                        "Skipping facility {} in '{}': unusable coordinates ({:?}, {:?})",
                        id,
                        dataset,
                        table.cell(row, lat_idx),
                        table.cell(row, lon_idx)
                    );
                    stats.missing_coordinates += 1;
                }
            }
        }

        stats.eligible = facilities.len();
        info!(
            "Catalog '{}': {} rows, {} excluded, {} without coordinates, {} eligible",
            dataset, stats.input_rows, stats.excluded, stats.missing_coordinates, stats.eligible
        );

        Ok(Catalog { facilities, stats })
    }
}

/// Keep rows whose `column` equals `equals` (numerically when both parse).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowFilter {
    pub column: String,
    pub equals: String,
}

impl RowFilter {
    pub fn apply(&self, raw: &RawTable) -> Result<RawTable> {
        let idx = raw.column_index(&self.column)?;
        let filtered = raw.retain_rows(|row| {
            self.matches(row.get(idx).map(String::as_str).unwrap_or(""))
        });
        info!(
            "Filter {} == {} on '{}': kept {} of {} rows",
            self.column,
            self.equals,
            raw.name(),
            filtered.len(),
            raw.len()
        );
        Ok(filtered)
    }

    fn matches(&self, value: &str) -> bool {
        let value = value.trim();
        let expected = self.equals.trim();
        match (value.parse::<f64>(), expected.parse::<f64>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => value == expected,
        }
    }
}

/// Integer identifiers, also accepting the `303.0` form float columns produce
fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

pub(crate) fn parse_point(lat: &str, lon: &str) -> Option<GeoPoint> {
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    GeoPoint::new(lat, lon).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEALTH: &str = "\
ID,original_Denominazione Struttura/Stabilimento,lat,lon,city,confidence
191,Duplicate Clinic,41.9001,12.5001,Roma,1
205,Policlinico Umberto I,41.9067,12.5117,Roma,1
303,Broken Entry,41.9016,12.5007,Roma,0
410,No Coordinates,,,Roma,0
512,San Camillo,41.8710,12.4553,Roma,1
";

    fn raw() -> RawTable {
        RawTable::from_reader("health", HEALTH.as_bytes()).unwrap()
    }

    fn filter() -> CatalogFilter {
        CatalogFilter::new("ID", "original_Denominazione Struttura/Stabilimento", "lat", "lon")
            .with_drop_columns(["city", "confidence"])
            .with_exclude_ids([303, 191])
    }

    #[test]
    fn test_excluded_ids_removed() {
        let catalog = filter().apply(&raw()).unwrap();
        let ids: Vec<i64> = catalog.facilities().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![205, 512]);
        assert!(catalog.get(303).is_none());

        let stats = catalog.stats();
        assert_eq!(stats.input_rows, 5);
        assert_eq!(stats.excluded, 2);
        assert_eq!(stats.missing_coordinates, 1);
        assert_eq!(stats.eligible, 2);
    }

    #[test]
    fn test_deterministic_and_raw_untouched() {
        let raw = raw();
        let before = raw.clone();
        let a = filter().apply(&raw).unwrap();
        let b = filter().apply(&raw).unwrap();
        assert_eq!(a, b);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_missing_required_column() {
        let filter = CatalogFilter::new("ID", "name", "lat", "lon");
        let err = filter.apply(&raw()).unwrap_err();
        assert!(matches!(err, VicinoError::Schema { ref column, .. } if column == "name"));
    }

    #[test]
    fn test_dropping_required_column_is_schema_error() {
        let filter = filter().with_drop_columns(["lat"]);
        assert!(matches!(
            filter.apply(&raw()),
            Err(VicinoError::Schema { .. })
        ));
    }

    #[test]
    fn test_bad_id_is_invalid_value() {
        let raw = RawTable::from_reader("health", "ID,name,lat,lon\nabc,X,41.9,12.5\n".as_bytes()).unwrap();
        let err = CatalogFilter::new("ID", "name", "lat", "lon").apply(&raw).unwrap_err();
        assert!(matches!(err, VicinoError::InvalidValue { row: 0, .. }));
    }

    #[test]
    fn test_float_ids_accepted() {
        assert_eq!(parse_id("303.0"), Some(303));
        assert_eq!(parse_id(" 42 "), Some(42));
        assert_eq!(parse_id("3.5"), None);
    }

    #[test]
    fn test_empty_catalog() {
        let raw = RawTable::from_reader("health", "ID,name,lat,lon\n303,X,41.9,12.5\n".as_bytes()).unwrap();
        let catalog = CatalogFilter::new("ID", "name", "lat", "lon")
            .with_exclude_ids([303])
            .apply(&raw)
            .unwrap();
        assert!(catalog.is_empty());
        assert!(matches!(catalog.require_non_empty(), Err(VicinoError::EmptyCatalog)));
    }

    #[test]
    fn test_row_filter_numeric_equality() {
        let raw = RawTable::from_reader("rome", "stop,BUS\nA,1\nB,0\nC,1.0\nD,\n".as_bytes()).unwrap();
        let filter = RowFilter {
            column: "BUS".to_string(),
            equals: "1".to_string(),
        };
        let kept = filter.apply(&raw).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.cell(1, 0), "C");
    }

    #[test]
    fn test_row_filter_missing_column() {
        let raw = RawTable::from_reader("rome", "stop\nA\n".as_bytes()).unwrap();
        let filter = RowFilter {
            column: "BUS".to_string(),
            equals: "1".to_string(),
        };
        assert!(matches!(filter.apply(&raw), Err(VicinoError::Schema { .. })));
    }
}
