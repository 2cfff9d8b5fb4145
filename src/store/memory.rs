use std::sync::RwLock;

use super::DatasetStore;
use crate::error::Result;

/// In-memory store, the test double for the file-backed repository.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(bytes: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(bytes)),
        }
    }
}

impl DatasetStore for MemoryStore {
    fn fetch(&self) -> Result<Option<Vec<u8>>> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn replace(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(bytes.to_vec());
        Ok(())
    }

    fn delete(&self) -> Result<bool> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        Ok(guard.take().is_some())
    }
}
