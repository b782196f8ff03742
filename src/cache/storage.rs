//! Durable byte stores backing the breach cache.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// Whole-blob key/value persistence.
///
/// `read` returns `Ok(None)` when nothing has been written yet.
pub trait CacheStorage: Send + Sync {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Whether `read`/`write` hit the filesystem or another blocking resource.
    fn is_blocking(&self) -> bool {
        false
    }
}

impl<S: CacheStorage + ?Sized> CacheStorage for Arc<S> {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(bytes)
    }

    fn is_blocking(&self) -> bool {
        (**self).is_blocking()
    }
}

/// Single-file store.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl CacheStorage for FileStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, bytes).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)
    }

    fn is_blocking(&self) -> bool {
        true
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
        }
    }

    /// Snapshot of the stored blob.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CacheStorage for MemoryStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self.bytes.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut guard = self.bytes.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_absent_on_first_run() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("cache.json"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("cache.json"));

        storage.write(b"{\"a\":1}").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));

        storage.write(b"{}").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some(&b"{}"[..]));
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_file_storage_read_error_on_directory() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(storage.read(), Err(StorageError::Read { .. })));
    }

    #[test]
    fn test_only_file_storage_blocks() {
        let dir = TempDir::new().unwrap();
        assert!(FileStorage::new(dir.path().join("cache.json")).is_blocking());
        assert!(Arc::new(FileStorage::new(dir.path().join("cache.json"))).is_blocking());
        assert!(!MemoryStorage::new().is_blocking());
        assert!(!Arc::new(MemoryStorage::new()).is_blocking());
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.read().unwrap().is_none());

        storage.write(b"data").unwrap();
        assert_eq!(storage.contents().as_deref(), Some(&b"data"[..]));
    }
}
