//! Storage for fetched screenshot images.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Owns screenshot bytes on behalf of the engine.
///
/// The engine holds at most one live handle at a time and releases the
/// previous one whenever it is replaced. Implementations must treat
/// `release` of an unknown id as a no-op so a double release cannot
/// corrupt anything.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores bytes and returns a fresh handle to them.
    async fn store(&self, bytes: Vec<u8>) -> Uuid;

    /// Drops the bytes behind a handle.
    async fn release(&self, id: Uuid);

    /// Reads the bytes behind a handle, if it is still live.
    async fn get(&self, id: Uuid) -> Option<Vec<u8>>;

    /// Number of live blobs.
    async fn count(&self) -> usize;
}

/// In-memory [`BlobStore`].
///
/// Screenshots are transient by nature (each poll replaces the last), so
/// keeping them on the heap and letting `release` free them immediately
/// is all the bookkeeping required.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<Uuid, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, bytes: Vec<u8>) -> Uuid {
        let id = Uuid::new_v4();
        self.blobs.write().await.insert(id, bytes);
        id
    }

    async fn release(&self, id: Uuid) {
        if self.blobs.write().await.remove(&id).is_none() {
            tracing::warn!(target: "screenshot", "Released unknown blob {}", id);
        }
    }

    async fn get(&self, id: Uuid) -> Option<Vec<u8>> {
        self.blobs.read().await.get(&id).cloned()
    }

    async fn count(&self) -> usize {
        self.blobs.read().await.len()
    }
}
