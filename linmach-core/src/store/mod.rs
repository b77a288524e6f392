//! # Hierarchical Store
//!
//! Named-dataset persistence: `/`-separated paths map to typed arrays or
//! integer scalars. Groups are implicit in the path.
//!
//! ## Example
//!
//! ```
//! use linmach_core::store::{Dataset, HierarchicalStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.write_array("model/biases", Dataset::vector(vec![0.3, -3.0])).unwrap();
//! store.write_scalar("model/activation", 1).unwrap();
//!
//! assert!(store.contains("/model/biases"));
//! assert_eq!(store.read_scalar("model/activation").unwrap(), 1);
//! ```

mod dataset;
mod file;
mod memory;

pub use dataset::{Dataset, ElementType, Values};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Invalid path: '{0}'")]
    InvalidPath(String),

    #[error("Store is read-only: {0}")]
    ReadOnly(PathBuf),

    #[error("Store already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error: {0}")]
    Format(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Format(err.to_string())
    }
}

/// How a file-backed store is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Existing store, reads only
    #[default]
    ReadOnly,
    /// Existing store or a new empty one, reads and writes
    ReadWrite,
    /// Start empty, replacing anything on disk
    Truncate,
    /// Start empty; fail if the store already exists
    Exclusive,
}

impl OpenMode {
    pub fn is_writable(self) -> bool {
        !matches!(self, OpenMode::ReadOnly)
    }
}

/// Store capability used by the persistence layer
pub trait HierarchicalStore {
    /// Read a typed array (or rank-0 dataset)
    fn read_array(&self, path: &str) -> StoreResult<Dataset>;

    /// Create or replace a dataset
    fn write_array(&mut self, path: &str, dataset: Dataset) -> StoreResult<()>;

    /// True if a dataset exists at `path`
    fn contains(&self, path: &str) -> bool;

    /// Read an integer scalar
    fn read_scalar(&self, path: &str) -> StoreResult<i64> {
        let dataset = self.read_array(path)?;
        dataset.as_i64_scalar().ok_or_else(|| StoreError::TypeMismatch {
            path: normalize_path(path).unwrap_or_else(|_| path.to_string()),
            expected: "integer scalar".to_string(),
            found: dataset.describe(),
        })
    }

    /// Write an integer scalar
    fn write_scalar(&mut self, path: &str, value: i64) -> StoreResult<()> {
        self.write_array(path, Dataset::scalar_i64(value))
    }
}

/// Canonical absolute form of a dataset path.
///
/// `a/b`, `/a/b` and `/a//b/` all map to `/a/b`. `.` and `..` are rejected.
pub fn normalize_path(path: &str) -> StoreResult<String> {
    let mut out = String::with_capacity(path.len() + 1);
    for part in path.split('/').filter(|p| !p.is_empty()) {
        if part == "." || part == ".." {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(out)
}

/// Join a group and a dataset name
pub fn join_path(group: &str, name: &str) -> String {
    let group = group.trim_end_matches('/');
    if group.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", group, name.trim_start_matches('/'))
    }
}
