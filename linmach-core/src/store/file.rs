//! File-backed store
//!
//! The whole store is one JSON document:
//!
//! ```text
//! {
//!   "format": "linmach-store",
//!   "version": 1,
//!   "datasets": {
//!     "/weights":    { "shape": [3, 2], "values": { "dtype": "f64", "data": "<base64>" } },
//!     "/activation": { "shape": [],     "values": { "dtype": "i64", "data": [1] } }
//!   }
//! }
//! ```
//!
//! Writes are buffered in memory. [`FileStore::flush`] replaces the file
//! through a temporary sibling and a rename; dropping a dirty store flushes
//! too unless disabled in [`StoreConfig`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{
    Dataset, HierarchicalStore, MemoryStore, OpenMode, StoreError, StoreResult, normalize_path,
};
use crate::config::StoreConfig;

const FORMAT_NAME: &str = "linmach-store";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoreDocument {
    format: String,
    version: u32,
    datasets: BTreeMap<String, Dataset>,
}

/// Store persisted as a single document on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    mode: OpenMode,
    config: StoreConfig,
    inner: MemoryStore,
    dirty: bool,
}

impl FileStore {
    /// Open with configuration taken from the environment
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> StoreResult<Self> {
        Self::open_with(path, mode, StoreConfig::from_env())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, mode: OpenMode, config: StoreConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let exists = path.exists();

        let (inner, dirty) = match mode {
            OpenMode::ReadOnly => (read_document(&path)?, false),
            OpenMode::ReadWrite if exists => (read_document(&path)?, false),
            OpenMode::ReadWrite => (MemoryStore::new(), true),
            OpenMode::Truncate => (MemoryStore::new(), true),
            OpenMode::Exclusive if exists => return Err(StoreError::AlreadyExists(path)),
            OpenMode::Exclusive => (MemoryStore::new(), true),
        };

        debug!(path = %path.display(), ?mode, datasets = inner.len(), "store opened");
        Ok(Self {
            path,
            mode,
            config,
            inner,
            dirty,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// True when there are writes not yet on disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Canonical paths of all datasets, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.inner.paths()
    }

    /// Write pending changes to disk
    pub fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty || !self.mode.is_writable() {
            return Ok(());
        }
        self.write_document()?;
        self.dirty = false;
        debug!(path = %self.path.display(), datasets = self.inner.len(), "store flushed");
        Ok(())
    }

    /// Flush and close
    pub fn close(mut self) -> StoreResult<()> {
        self.flush()
    }

    fn write_document(&self) -> StoreResult<()> {
        let doc = StoreDocument {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            datasets: self.inner.as_map().clone(),
        };

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let written = self
            .write_to(&tmp, &doc)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e)));
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }

    fn write_to(&self, tmp: &Path, doc: &StoreDocument) -> StoreResult<()> {
        let file = fs::File::create(tmp).map_err(|e| io_error(tmp, e))?;
        let mut writer = BufWriter::new(file);
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut writer, doc)?;
        } else {
            serde_json::to_writer(&mut writer, doc)?;
        }
        writer.flush().map_err(|e| io_error(tmp, e))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_document(path: &Path) -> StoreResult<MemoryStore> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let doc: StoreDocument = serde_json::from_str(&text)?;

    if doc.format != FORMAT_NAME {
        return Err(StoreError::Format(format!("unexpected format '{}'", doc.format)));
    }
    if doc.version != FORMAT_VERSION {
        return Err(StoreError::Format(format!("unsupported version {}", doc.version)));
    }
    for (key, dataset) in &doc.datasets {
        if normalize_path(key)? != *key {
            return Err(StoreError::InvalidPath(key.clone()));
        }
        dataset.validate()?;
    }
    Ok(MemoryStore::from_map(doc.datasets))
}

impl HierarchicalStore for FileStore {
    fn read_array(&self, path: &str) -> StoreResult<Dataset> {
        self.inner.read_array(path)
    }

    fn write_array(&mut self, path: &str, dataset: Dataset) -> StoreResult<()> {
        if !self.mode.is_writable() {
            return Err(StoreError::ReadOnly(self.path.clone()));
        }
        self.inner.write_array(path, dataset)?;
        self.dirty = true;
        Ok(())
    }

    fn contains(&self, path: &str) -> bool {
        self.inner.contains(path)
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if self.dirty && self.config.flush_on_drop {
            if let Err(e) = self.flush() {
                warn!(path = %self.path.display(), error = %e, "flush on drop failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> StoreConfig {
        StoreConfig {
            pretty: false,
            flush_on_drop: true,
        }
    }

    #[test]
    fn test_write_flush_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open_with(&path, OpenMode::Exclusive, config()).unwrap();
        store.write_array("g/v", Dataset::vector(vec![0.1, 0.2])).unwrap();
        store.write_scalar("g/k", 3).unwrap();
        assert!(store.is_dirty());
        store.flush().unwrap();
        assert!(!store.is_dirty());
        drop(store);

        let store = FileStore::open_with(&path, OpenMode::ReadOnly, config()).unwrap();
        assert_eq!(store.read_array("/g/v").unwrap().as_f64().unwrap(), &[0.1, 0.2]);
        assert_eq!(store.read_scalar("g/k").unwrap(), 3);
    }

    #[test]
    fn test_drop_flushes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut store = FileStore::open_with(&path, OpenMode::Truncate, config()).unwrap();
            store.write_scalar("k", 9).unwrap();
        }
        let store = FileStore::open_with(&path, OpenMode::ReadOnly, config()).unwrap();
        assert_eq!(store.read_scalar("k").unwrap(), 9);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        FileStore::open_with(&path, OpenMode::Truncate, config()).unwrap().close().unwrap();

        let mut store = FileStore::open_with(&path, OpenMode::ReadOnly, config()).unwrap();
        assert!(matches!(store.write_scalar("k", 1), Err(StoreError::ReadOnly(_))));
    }

    #[test]
    fn test_read_only_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileStore::open_with(dir.path().join("absent.json"), OpenMode::ReadOnly, config()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_exclusive_refuses_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        FileStore::open_with(&path, OpenMode::Truncate, config()).unwrap().close().unwrap();
        assert!(matches!(
            FileStore::open_with(&path, OpenMode::Exclusive, config()),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_read_write_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut store = FileStore::open_with(&path, OpenMode::Truncate, config()).unwrap();
            store.write_scalar("a", 1).unwrap();
        }
        {
            let mut store = FileStore::open_with(&path, OpenMode::ReadWrite, config()).unwrap();
            store.write_scalar("b", 2).unwrap();
        }
        let store = FileStore::open_with(&path, OpenMode::ReadOnly, config()).unwrap();
        assert_eq!(store.paths().collect::<Vec<_>>(), vec!["/a", "/b"]);
    }

    #[test]
    fn test_rejects_foreign_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.json");
        fs::write(&path, r#"{"format":"something-else","version":1,"datasets":{}}"#).unwrap();
        assert!(matches!(
            FileStore::open_with(&path, OpenMode::ReadOnly, config()),
            Err(StoreError::Format(_))
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStore::open_with(&path, OpenMode::ReadOnly, config()),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn test_rejects_overflowing_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.json");
        fs::write(
            &path,
            r#"{"format":"linmach-store","version":1,"datasets":{"/weights":{"shape":[9223372036854775808,2],"values":{"dtype":"f64","data":""}}}}"#,
        )
        .unwrap();
        assert!(matches!(
            FileStore::open_with(&path, OpenMode::ReadOnly, config()),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn test_failed_flush_removes_temporary() {
        let dir = TempDir::new().unwrap();
        // a directory in place of the store file makes the final rename fail
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        let config = StoreConfig {
            pretty: false,
            flush_on_drop: false,
        };
        let mut store = FileStore::open_with(&path, OpenMode::Truncate, config).unwrap();
        store.write_scalar("k", 1).unwrap();
        assert!(matches!(store.flush(), Err(StoreError::Io { .. })));
        assert!(store.is_dirty());
        assert!(!dir.path().join("taken.tmp").exists());
    }

    #[test]
    fn test_rejects_inconsistent_dataset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"format":"linmach-store","version":1,"datasets":{"/k":{"shape":[2],"values":{"dtype":"i64","data":[1]}}}}"#,
        )
        .unwrap();
        assert!(matches!(
            FileStore::open_with(&path, OpenMode::ReadOnly, config()),
            Err(StoreError::Format(_))
        ));
    }
}
