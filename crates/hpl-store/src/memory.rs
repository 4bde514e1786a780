use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use hpl_types::ContentRef;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{MetadataStore, PayloadKind};

/// In-memory, HashMap-backed metadata store.
///
/// The EXPLICIT development fallback for environments with no storage
/// network credentials, and the backend for tests. Construction is the
/// opt-in: nothing ever selects this store implicitly when a networked
/// store's request happens to fail. References are BLAKE3-derived
/// (`b3-<hex>`), so the same bytes always resolve to the same reference.
pub struct InMemoryMetadataStore {
    payloads: RwLock<HashMap<ContentRef, Vec<u8>>>,
    max_payload_bytes: usize,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::with_limit(8 * 1024 * 1024)
    }

    pub fn with_limit(max_payload_bytes: usize) -> Self {
        Self {
            payloads: RwLock::new(HashMap::new()),
            max_payload_bytes,
        }
    }

    /// Number of distinct payloads stored.
    pub fn len(&self) -> usize {
        self.payloads.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMetadataStore")
            .field("payload_count", &self.len())
            .finish()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn upload(&self, bytes: &[u8], _kind: PayloadKind) -> StoreResult<ContentRef> {
        if bytes.len() > self.max_payload_bytes {
            return Err(StoreError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.max_payload_bytes,
            });
        }

        let reference = ContentRef::from_content(bytes);
        let mut payloads = self.payloads.write().map_err(|_| StoreError::WriteFailed {
            reason: "store lock poisoned".into(),
        })?;
        // Content addressing makes re-uploads idempotent.
        payloads.entry(reference.clone()).or_insert_with(|| bytes.to_vec());
        debug!(reference = %reference, size = bytes.len(), "stored payload in memory");
        Ok(reference)
    }

    async fn fetch(&self, reference: &ContentRef) -> StoreResult<Vec<u8>> {
        let payloads = self.payloads.read().map_err(|_| StoreError::WriteFailed {
            reason: "store lock poisoned".into(),
        })?;
        payloads
            .get(reference)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(reference.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_fetch_roundtrip() {
        let store = InMemoryMetadataStore::new();
        let reference = store.upload(b"round trip", PayloadKind::Json).await.unwrap();
        let bytes = store.fetch(&reference).await.unwrap();
        assert_eq!(bytes, b"round trip");
    }

    #[tokio::test]
    async fn same_bytes_same_reference() {
        let store = InMemoryMetadataStore::new();
        let a = store.upload(b"identical", PayloadKind::Json).await.unwrap();
        let b = store.upload(b"identical", PayloadKind::Image).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_reference_is_not_found() {
        let store = InMemoryMetadataStore::new();
        let reference = ContentRef::from_content(b"never stored");
        let err = store.fetch(&reference).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn size_limit_enforced() {
        let store = InMemoryMetadataStore::with_limit(4);
        let err = store
            .upload(b"too big", PayloadKind::Image)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PayloadTooLarge { size: 7, limit: 4 }));
    }

    #[tokio::test]
    async fn roundtrip_arbitrary_binary_payloads() {
        let store = InMemoryMetadataStore::new();
        for payload in [vec![0u8; 1], vec![0xff; 512], (0..=255u8).collect::<Vec<_>>()] {
            let reference = store.upload(&payload, PayloadKind::Image).await.unwrap();
            assert_eq!(store.fetch(&reference).await.unwrap(), payload);
        }
    }
}
