use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::DatasetStore;
use crate::error::Result;

/// File-backed store: one dataset file with a fixed name, overwritten
/// wholesale on upload. Uploads are staged to a temporary file in the target
/// directory and then persisted over the dataset path.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetStore for FileStore {
    fn fetch(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&self, bytes: &[u8]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(bytes)?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn delete(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("dataset.xlsx"));
        assert_eq!(store.fetch().unwrap(), None);
    }

    #[test]
    fn test_replace_and_fetch() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("dataset.xlsx"));

        store.replace(b"first").unwrap();
        assert_eq!(store.fetch().unwrap().as_deref(), Some(&b"first"[..]));

        store.replace(b"second").unwrap();
        assert_eq!(store.fetch().unwrap().as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("dataset.xlsx"));

        assert!(!store.delete().unwrap());
        store.replace(b"data").unwrap();
        assert!(store.delete().unwrap());
        assert_eq!(store.fetch().unwrap(), None);
    }

    #[test]
    fn test_replace_leaves_no_staging_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("dataset.xlsx"));
        store.replace(b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
