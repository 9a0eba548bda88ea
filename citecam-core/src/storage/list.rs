//! Durable, write-through entity lists

use super::{StorageProvider, StorageResult};
use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// A JSON document holding an ordered list of `T` under one storage key
///
/// Holds no items itself; callers own the in-memory list and hand the whole
/// list to [`PersistedList::save`] after every mutation.
pub struct PersistedList<T> {
    storage: Arc<dyn StorageProvider>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistedList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(storage: Arc<dyn StorageProvider>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// Load the list; a document that was never written loads as empty
    pub async fn load(&self) -> StorageResult<Vec<T>> {
        match self.storage.read(&self.key).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(format!("{}: {}", self.key, e))),
            Err(StorageError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Replace the stored document with `items`
    pub async fn save(&self, items: &[T]) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(items)
            .map_err(|e| StorageError::Serialization(format!("{}: {}", self.key, e)))?;
        self.storage.write(&self.key, data).await?;
        tracing::debug!(key = %self.key, count = items.len(), "persisted list");
        Ok(())
    }
}
