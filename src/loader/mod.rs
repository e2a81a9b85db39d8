//! Dataset loading for the five input tables.
//!
//! This module resolves the input CSV files against a data directory,
//! decodes them into typed rows, and validates each table's schema
//! before anything reaches the aggregation pipeline.

mod cache;

pub use cache::DatasetCache;

use crate::error::{Error, Result};
use crate::models::{CompetitorRecord, CustomerRecord, ItemRecord, SalesRecord, StoreRecord};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Table name used in error messages and logs for the sales scenario data.
pub const SCENARIO_TABLE: &str = "scenario";
/// Table name for the competitor master.
pub const COMPETITOR_TABLE: &str = "competitor_master";
/// Table name for the store master.
pub const STORE_TABLE: &str = "store_master";
/// Table name for the customer master.
pub const CUSTOMER_TABLE: &str = "customer_master";
/// Table name for the item master.
pub const ITEM_TABLE: &str = "item_master";

/// Resolved locations of the five input tables.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub scenario: PathBuf,
    pub competitor: PathBuf,
    pub store: PathBuf,
    pub customer: PathBuf,
    pub item: PathBuf,
}

impl DatasetPaths {
    /// Resolve input file names from config against a data directory.
    pub fn from_config(data_dir: &Path, inputs: &crate::config::InputsConfig) -> Self {
        Self {
            scenario: data_dir.join(&inputs.scenario),
            competitor: data_dir.join(&inputs.competitor),
            store: data_dir.join(&inputs.store),
            customer: data_dir.join(&inputs.customer),
            item: data_dir.join(&inputs.item),
        }
    }

    /// All `(table name, path)` pairs in load order.
    pub fn entries(&self) -> [(&'static str, &PathBuf); 5] {
        [
            (SCENARIO_TABLE, &self.scenario),
            (COMPETITOR_TABLE, &self.competitor),
            (STORE_TABLE, &self.store),
            (CUSTOMER_TABLE, &self.customer),
            (ITEM_TABLE, &self.item),
        ]
    }
}

/// The five loaded input tables for one computation pass.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub sales: Vec<SalesRecord>,
    pub stores: Vec<StoreRecord>,
    pub competitors: Vec<CompetitorRecord>,
    pub customers: Vec<CustomerRecord>,
    pub items: Vec<ItemRecord>,
}

/// Presence and size of one input file, for dry-run listings.
#[derive(Debug, Clone)]
pub struct InputStatus {
    /// Table name.
    pub table: &'static str,
    /// Resolved file path.
    pub path: PathBuf,
    /// File size in bytes, or `None` if the file is missing.
    pub size: Option<u64>,
}

/// Probe the input files without decoding them.
pub fn probe_inputs(paths: &DatasetPaths) -> Vec<InputStatus> {
    paths
        .entries()
        .into_iter()
        .map(|(table, path)| InputStatus {
            table,
            path: path.clone(),
            size: fs::metadata(path).ok().map(|m| m.len()),
        })
        .collect()
}

/// Load all five tables, validating each one's schema.
pub fn load_dataset(paths: &DatasetPaths) -> Result<Dataset> {
    let sales = load_table(
        &paths.scenario,
        SCENARIO_TABLE,
        &["store_id", "units_sold"],
    )?;
    let competitors = load_table(&paths.competitor, COMPETITOR_TABLE, &["comp_market"])?;
    let stores = load_table(&paths.store, STORE_TABLE, &["store_id", "store_market"])?;
    let customers = load_table(&paths.customer, CUSTOMER_TABLE, &["customer_id"])?;
    let items = load_table(&paths.item, ITEM_TABLE, &["item_id"])?;

    Ok(Dataset {
        sales,
        stores,
        competitors,
        customers,
        items,
    })
}

/// Load one CSV table into typed rows.
///
/// Fails with `MissingInput` when the file is absent and `Schema` when a
/// required column is missing from the header or a value fails to decode.
/// A table with zero data rows is a warning, not an error.
fn load_table<T: DeserializeOwned>(path: &Path, table: &str, required: &[&str]) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(Error::MissingInput {
            table: table.to_string(),
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| Error::Csv {
        table: table.to_string(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| Error::Csv {
            table: table.to_string(),
            source,
        })?
        .clone();

    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(Error::Schema {
                table: table.to_string(),
                column: (*column).to_string(),
                reason: "required column missing from header".to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|err| schema_error(table, &headers, err))?;
        rows.push(row);
    }

    if rows.is_empty() {
        warn!("Input table '{}' has no data rows", table);
    }

    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Map a csv decode failure to a `Schema` error naming the offending column.
fn schema_error(table: &str, headers: &csv::StringRecord, err: csv::Error) -> Error {
    if let csv::ErrorKind::Deserialize { err: de, .. } = err.kind() {
        let column = de
            .field()
            .and_then(|index| headers.get(index as usize))
            .unwrap_or("<unknown>")
            .to_string();

        return Error::Schema {
            table: table.to_string(),
            column,
            reason: de.to_string(),
        };
    }

    Error::Csv {
        table: table.to_string(),
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn sample_paths(dir: &Path) -> DatasetPaths {
        write_file(
            dir,
            "Scenario3_Data.csv",
            "store_id,units_sold,week\n1,100,1\n1,50,2\n2,30,1\n",
        );
        write_file(
            dir,
            "Competitor_Master.csv",
            "comp_market,comp_name\nEast,AlphaMart\nEast,BetaMart\nWest,GammaMart\n",
        );
        write_file(
            dir,
            "Store_Master.csv",
            "store_id,store_market\n1,North\n2,South\n",
        );
        write_file(dir, "Customer_Master.csv", "customer_id\n10\n11\n");
        write_file(dir, "Item_Master.csv", "item_id\n500\n");

        DatasetPaths {
            scenario: dir.join("Scenario3_Data.csv"),
            competitor: dir.join("Competitor_Master.csv"),
            store: dir.join("Store_Master.csv"),
            customer: dir.join("Customer_Master.csv"),
            item: dir.join("Item_Master.csv"),
        }
    }

    #[test]
    fn test_load_dataset() {
        let dir = TempDir::new().unwrap();
        let paths = sample_paths(dir.path());

        let dataset = load_dataset(&paths).unwrap();

        assert_eq!(dataset.sales.len(), 3);
        assert_eq!(dataset.stores.len(), 2);
        assert_eq!(dataset.competitors.len(), 3);
        assert_eq!(dataset.customers.len(), 2);
        assert_eq!(dataset.items.len(), 1);
        assert_eq!(dataset.sales[0].store_id, 1);
        assert_eq!(dataset.sales[0].units_sold, 100);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let dir = TempDir::new().unwrap();
        let paths = sample_paths(dir.path());

        // Scenario3_Data.csv carries a `week` column the schema does not know
        let dataset = load_dataset(&paths).unwrap();
        assert_eq!(dataset.sales.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut paths = sample_paths(dir.path());
        paths.store = dir.path().join("nope.csv");

        let err = load_dataset(&paths).unwrap_err();
        match err {
            Error::MissingInput { table, .. } => assert_eq!(table, STORE_TABLE),
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let dir = TempDir::new().unwrap();
        let mut paths = sample_paths(dir.path());
        paths.scenario = write_file(dir.path(), "bad.csv", "store_id,week\n1,1\n");

        let err = load_dataset(&paths).unwrap_err();
        match err {
            Error::Schema { table, column, .. } => {
                assert_eq!(table, SCENARIO_TABLE);
                assert_eq!(column, "units_sold");
            }
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_units() {
        let dir = TempDir::new().unwrap();
        let mut paths = sample_paths(dir.path());
        paths.scenario = write_file(
            dir.path(),
            "bad_units.csv",
            "store_id,units_sold\n1,lots\n",
        );

        let err = load_dataset(&paths).unwrap_err();
        match err {
            Error::Schema { table, column, .. } => {
                assert_eq!(table, SCENARIO_TABLE);
                assert_eq!(column, "units_sold");
            }
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let mut paths = sample_paths(dir.path());
        paths.scenario = write_file(dir.path(), "empty.csv", "store_id,units_sold\n");

        let dataset = load_dataset(&paths).unwrap();
        assert!(dataset.sales.is_empty());
    }

    #[test]
    fn test_probe_inputs() {
        let dir = TempDir::new().unwrap();
        let mut paths = sample_paths(dir.path());
        paths.item = dir.path().join("gone.csv");

        let statuses = probe_inputs(&paths);
        assert_eq!(statuses.len(), 5);
        assert!(statuses[0].size.is_some());
        assert_eq!(statuses[4].table, ITEM_TABLE);
        assert!(statuses[4].size.is_none());
    }
}
