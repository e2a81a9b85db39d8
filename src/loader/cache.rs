//! Memoized dataset loading keyed by input file identity.
//!
//! The cache fingerprints the five input files by path and modification
//! time. A hit returns the already-loaded tables; touching any input file
//! causes a full reload on the next call. Invalidation is explicit.

use super::{load_dataset, Dataset, DatasetPaths};
use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::debug;

/// Memoizing wrapper around [`load_dataset`].
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: Vec<(PathBuf, SystemTime)>,
    dataset: Dataset,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the dataset, reusing the cached tables when no input file
    /// has changed since the previous load.
    pub fn load(&mut self, paths: &DatasetPaths) -> Result<&Dataset> {
        let fingerprint = fingerprint(paths)?;

        match &mut self.entry {
            Some(entry) if entry.fingerprint == fingerprint => {
                debug!("Dataset cache hit; reusing loaded tables");
                Ok(&entry.dataset)
            }
            entry => {
                let dataset = load_dataset(paths)?;
                let entry = entry.insert(CacheEntry {
                    fingerprint,
                    dataset,
                });
                Ok(&entry.dataset)
            }
        }
    }

    /// Drop the cached tables; the next `load` rereads every file.
    #[allow(dead_code)] // Cache control for long-lived sessions
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a dataset is currently cached.
    #[allow(dead_code)] // Cache control for long-lived sessions
    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}

/// Fingerprint the input files by path and mtime.
fn fingerprint(paths: &DatasetPaths) -> Result<Vec<(PathBuf, SystemTime)>> {
    paths
        .entries()
        .into_iter()
        .map(|(table, path)| {
            let metadata = fs::metadata(path).map_err(|_| Error::MissingInput {
                table: table.to_string(),
                path: path.clone(),
            })?;
            Ok((path.clone(), metadata.modified()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn sample_paths(dir: &Path) -> DatasetPaths {
        write_file(dir, "scenario.csv", "store_id,units_sold\n1,100\n2,30\n");
        write_file(dir, "competitor.csv", "comp_market\nEast\n");
        write_file(dir, "store.csv", "store_id,store_market\n1,North\n");
        write_file(dir, "customer.csv", "customer_id\n10\n");
        write_file(dir, "item.csv", "item_id\n500\n");

        DatasetPaths {
            scenario: dir.join("scenario.csv"),
            competitor: dir.join("competitor.csv"),
            store: dir.join("store.csv"),
            customer: dir.join("customer.csv"),
            item: dir.join("item.csv"),
        }
    }

    #[test]
    fn test_cache_hit_on_unchanged_inputs() {
        let dir = TempDir::new().unwrap();
        let paths = sample_paths(dir.path());
        let mut cache = DatasetCache::new();

        let first = cache.load(&paths).unwrap().sales.len();
        assert!(cache.is_cached());

        let second = cache.load(&paths).unwrap().sales.len();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reload_on_modified_input() {
        let dir = TempDir::new().unwrap();
        let paths = sample_paths(dir.path());
        let mut cache = DatasetCache::new();

        assert_eq!(cache.load(&paths).unwrap().sales.len(), 2);

        // Rewrite with an extra row and a bumped mtime
        let path = write_file(
            dir.path(),
            "scenario.csv",
            "store_id,units_sold\n1,100\n2,30\n3,70\n",
        );
        let later = SystemTime::now() + std::time::Duration::from_secs(2);
        fs::File::options()
            .append(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert_eq!(cache.load(&paths).unwrap().sales.len(), 3);
    }

    #[test]
    fn test_explicit_invalidation() {
        let dir = TempDir::new().unwrap();
        let paths = sample_paths(dir.path());
        let mut cache = DatasetCache::new();

        cache.load(&paths).unwrap();
        assert!(cache.is_cached());

        cache.invalidate();
        assert!(!cache.is_cached());

        cache.load(&paths).unwrap();
        assert!(cache.is_cached());
    }

    #[test]
    fn test_missing_file_surfaces_before_load() {
        let dir = TempDir::new().unwrap();
        let mut paths = sample_paths(dir.path());
        paths.item = dir.path().join("gone.csv");

        let mut cache = DatasetCache::new();
        let err = cache.load(&paths).unwrap_err();
        match err {
            Error::MissingInput { table, .. } => assert_eq!(table, super::super::ITEM_TABLE),
            other => panic!("expected MissingInput, got {other:?}"),
        }
        assert!(!cache.is_cached());
    }
}
