use std::sync::Arc;

use async_trait::async_trait;
use hpl_types::ContentRef;

use crate::error::StoreResult;

/// What an uploaded payload contains, used to pick a content type on the
/// write path. The store never interprets fetched bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Image,
}

impl PayloadKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            PayloadKind::Json => "application/json",
            PayloadKind::Image => "application/octet-stream",
        }
    }
}

/// Content-addressed metadata store.
///
/// All implementations must satisfy these invariants:
/// - Payloads are immutable once written; the same bytes resolve to the
///   same reference for a given backend.
/// - `fetch` returns the exact stored bytes or a typed error — never
///   placeholder data (placeholders are a presentation-layer decision).
/// - `upload` failures surface as errors; no implementation silently
///   degrades to a local-only mode when real credentials are configured.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Store bytes and return their content reference.
    async fn upload(&self, bytes: &[u8], kind: PayloadKind) -> StoreResult<ContentRef>;

    /// Resolve a content reference back to its bytes.
    async fn fetch(&self, reference: &ContentRef) -> StoreResult<Vec<u8>>;
}

#[async_trait]
impl<T: MetadataStore + ?Sized> MetadataStore for Arc<T> {
    async fn upload(&self, bytes: &[u8], kind: PayloadKind) -> StoreResult<ContentRef> {
        (**self).upload(bytes, kind).await
    }

    async fn fetch(&self, reference: &ContentRef) -> StoreResult<Vec<u8>> {
        (**self).fetch(reference).await
    }
}

#[async_trait]
impl<'a, T: MetadataStore + ?Sized> MetadataStore for &'a T {
    async fn upload(&self, bytes: &[u8], kind: PayloadKind) -> StoreResult<ContentRef> {
        (**self).upload(bytes, kind).await
    }

    async fn fetch(&self, reference: &ContentRef) -> StoreResult<Vec<u8>> {
        (**self).fetch(reference).await
    }
}
