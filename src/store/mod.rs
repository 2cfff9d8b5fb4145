pub mod file_store;
pub mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Repository over the single current dataset. Exactly one dataset exists at
/// a time; upload replaces it wholesale and delete removes it. No historical
/// versions are kept.
pub trait DatasetStore: Send + Sync {
    /// Raw bytes of the current dataset, or `None` when no dataset exists.
    fn fetch(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the dataset with a newly uploaded file.
    fn replace(&self, bytes: &[u8]) -> Result<()>;

    /// Remove the dataset. Returns whether a dataset existed.
    fn delete(&self) -> Result<bool>;
}
