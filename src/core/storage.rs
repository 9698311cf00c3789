//! Storage collaborator - where documents are read from and written to
//!
//! The job runner only talks to [`Storage`]; the CLI uses [`FsStorage`]
//! rooted at the project directory and tests use [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Read/write access to text documents by location
pub trait Storage {
    /// Read the document at `location`
    fn read(&self, location: &Path) -> Result<String, StorageError>;

    /// Write `contents` to `location`, replacing any existing document
    fn write(&self, location: &Path, contents: &str) -> Result<(), StorageError>;

    /// Check whether a document exists at `location`
    fn exists(&self, location: &Path) -> bool;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Filesystem storage; relative locations resolve against `root`
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a location
    pub fn resolve(&self, location: &Path) -> PathBuf {
        if location.is_absolute() {
            location.to_path_buf()
        } else {
            self.root.join(location)
        }
    }
}

impl Storage for FsStorage {
    fn read(&self, location: &Path) -> Result<String, StorageError> {
        let path = self.resolve(location);
        if !path.exists() {
            return Err(StorageError::NotFound(path));
        }
        fs::read_to_string(&path).map_err(|e| StorageError::Read {
            path,
            message: e.to_string(),
        })
    }

    fn write(&self, location: &Path, contents: &str) -> Result<(), StorageError> {
        let path = self.resolve(location);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Write {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }
        fs::write(&path, contents).map_err(|e| StorageError::Write {
            path,
            message: e.to_string(),
        })
    }

    fn exists(&self, location: &Path) -> bool {
        self.resolve(location).exists()
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RefCell<BTreeMap<PathBuf, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document
    pub fn with_document(self, location: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.documents
            .borrow_mut()
            .insert(location.into(), contents.into());
        self
    }

    /// All locations currently stored, sorted
    pub fn locations(&self) -> Vec<PathBuf> {
        self.documents.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, location: &Path) -> Result<String, StorageError> {
        self.documents
            .borrow()
            .get(location)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(location.to_path_buf()))
    }

    fn write(&self, location: &Path, contents: &str) -> Result<(), StorageError> {
        self.documents
            .borrow_mut()
            .insert(location.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, location: &Path) -> bool {
        self.documents.borrow().contains_key(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_storage_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let location = Path::new("generated/uml/bank.json");

        storage.write(location, "{}").unwrap();
        assert!(storage.exists(location));
        assert_eq!(storage.read(location).unwrap(), "{}");
        assert!(dir.path().join("generated/uml/bank.json").is_file());
    }

    #[test]
    fn test_fs_storage_missing_document() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let err = storage.read(Path::new("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new().with_document("a.txt", "hello");
        assert_eq!(storage.read(Path::new("a.txt")).unwrap(), "hello");
        storage.write(Path::new("b.txt"), "world").unwrap();
        assert_eq!(storage.locations(), vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(!storage.exists(Path::new("c.txt")));
    }
}
