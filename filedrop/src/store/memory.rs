use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{FiledropError, FiledropResult};
use crate::store::ObjectStore;
use crate::types::ObjectRef;

/// In-memory object store for testing and development.
///
/// Objects live in a process-local map keyed by canonical address, so lookup
/// is exact by construction: keys that merely share a prefix with a stored
/// object do not register as present. All data is lost when the process
/// terminates.
///
/// Clones share the same underlying map, which lets tests keep a handle for
/// inspection while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryObjectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn exists(&self, object: &ObjectRef) -> FiledropResult<bool> {
        if object.key().is_empty() {
            return Ok(false);
        }
        let objects = self.objects.lock().await;
        Ok(objects.contains_key(&object.address()))
    }

    async fn read(&self, object: &ObjectRef) -> FiledropResult<Option<Bytes>> {
        let objects = self.objects.lock().await;
        Ok(objects.get(&object.address()).cloned())
    }

    async fn write(&self, object: &ObjectRef, data: Bytes) -> FiledropResult<()> {
        let mut objects = self.objects.lock().await;
        info!(address = %object.address(), bytes = data.len(), "storing object");
        objects.insert(object.address(), data);
        Ok(())
    }

    async fn size(&self, object: &ObjectRef) -> FiledropResult<u64> {
        let objects = self.objects.lock().await;
        objects
            .get(&object.address())
            .map(|data| data.len() as u64)
            .ok_or_else(|| FiledropError::Store {
                address: object.address(),
                reason: "object not found".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exists_is_an_exact_key_match() {
        let store = MemoryObjectStore::new();
        let stored = ObjectRef::new("bucket", "user/data.csv.backup");
        store
            .write(&stored, Bytes::from_static(b"Id\n"))
            .await
            .unwrap();

        let prefix = ObjectRef::new("bucket", "user/data.csv");
        assert!(!store.exists(&prefix).await.unwrap());
        assert!(store.exists(&stored).await.unwrap());
    }

    #[tokio::test]
    async fn empty_key_is_never_present() {
        let store = MemoryObjectStore::new();

        let empty = ObjectRef::new("bucket", "");
        assert!(!store.exists(&empty).await.unwrap());
    }

    #[tokio::test]
    async fn write_overwrites_and_size_tracks_content() {
        let store = MemoryObjectStore::new();
        let object = ObjectRef::new("bucket", "mstr/data.csv");

        store
            .write(&object, Bytes::from_static(b"Id\n1\n"))
            .await
            .unwrap();
        store
            .write(&object, Bytes::from_static(b"Id\n1\n2\n"))
            .await
            .unwrap();

        assert_eq!(store.size(&object).await.unwrap(), 7);
        assert_eq!(
            store.read(&object).await.unwrap(),
            Some(Bytes::from_static(b"Id\n1\n2\n"))
        );
    }

    #[tokio::test]
    async fn size_of_missing_object_is_an_error() {
        let store = MemoryObjectStore::new();

        let missing = ObjectRef::new("bucket", "mstr/missing.csv");
        assert!(store.size(&missing).await.is_err());
    }
}
