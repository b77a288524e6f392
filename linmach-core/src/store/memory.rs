//! In-memory store

use std::collections::BTreeMap;

use super::{Dataset, HierarchicalStore, StoreError, StoreResult, normalize_path};

/// Store backed by an ordered map of canonical paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    datasets: BTreeMap<String, Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(datasets: BTreeMap<String, Dataset>) -> Self {
        Self { datasets }
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, Dataset> {
        &self.datasets
    }

    /// Canonical paths of all datasets, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Remove a dataset, returning it
    pub fn remove(&mut self, path: &str) -> StoreResult<Dataset> {
        let key = normalize_path(path)?;
        self.datasets.remove(&key).ok_or(StoreError::NotFound(key))
    }

    pub fn clear(&mut self) {
        self.datasets.clear();
    }
}

impl HierarchicalStore for MemoryStore {
    fn read_array(&self, path: &str) -> StoreResult<Dataset> {
        let key = normalize_path(path)?;
        self.datasets.get(&key).cloned().ok_or(StoreError::NotFound(key))
    }

    fn write_array(&mut self, path: &str, dataset: Dataset) -> StoreResult<()> {
        let key = normalize_path(path)?;
        self.datasets.insert(key, dataset);
        Ok(())
    }

    fn contains(&self, path: &str) -> bool {
        normalize_path(path).is_ok_and(|key| self.datasets.contains_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read() {
        let mut store = MemoryStore::new();
        store.write_array("a/b", Dataset::vector(vec![1.0, 2.0])).unwrap();
        let ds = store.read_array("/a/b").unwrap();
        assert_eq!(ds.as_f64().unwrap(), &[1.0, 2.0]);
        assert_eq!(store.paths().collect::<Vec<_>>(), vec!["/a/b"]);
    }

    #[test]
    fn test_missing() {
        let store = MemoryStore::new();
        assert!(matches!(store.read_array("nope"), Err(StoreError::NotFound(p)) if p == "/nope"));
        assert!(!store.contains("nope"));
        assert!(!store.contains(""));
    }

    #[test]
    fn test_scalar_type_checked() {
        let mut store = MemoryStore::new();
        store.write_array("x", Dataset::vector(vec![1.0])).unwrap();
        assert!(matches!(store.read_scalar("x"), Err(StoreError::TypeMismatch { .. })));

        store.write_scalar("x", 5).unwrap();
        assert_eq!(store.read_scalar("x").unwrap(), 5);
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        store.write_scalar("k", 1).unwrap();
        assert_eq!(store.len(), 1);
        store.remove("k").unwrap();
        assert!(store.is_empty());
        assert!(store.remove("k").is_err());
    }
}
