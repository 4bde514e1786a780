use std::sync::Arc;

use async_trait::async_trait;
use hpl_types::EventRef;

use crate::error::LedgerError;
use crate::event::{AppendFence, EventFilter, EventPayload, LedgerEvent};

/// Read boundary over the external ledger.
///
/// Implementations must be read-only, idempotent, and safe to call
/// repeatedly. A scan that matches nothing returns an empty vector, not an
/// error. Events come back in ledger-append order; the ledger is only
/// assumed to support range scans, so filtering may happen client-side.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn scan(&self, filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError>;
}

/// Write boundary over the external ledger.
///
/// Appending is the caller's responsibility after the gate has authorized a
/// step; the write path can fail independently (signer rejection, balance,
/// revert) and those failures surface as typed [`LedgerError`]s. A fenced
/// append must be rejected with [`LedgerError::StaleHead`] when the batch's
/// step count no longer matches the fence.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    async fn append(
        &self,
        payload: EventPayload,
        fence: Option<AppendFence>,
    ) -> Result<EventRef, LedgerError>;
}

#[async_trait]
impl<T: LedgerReader + ?Sized> LedgerReader for Arc<T> {
    async fn scan(&self, filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError> {
        (**self).scan(filter).await
    }
}

#[async_trait]
impl<'a, T: LedgerReader + ?Sized> LedgerReader for &'a T {
    async fn scan(&self, filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError> {
        (**self).scan(filter).await
    }
}

#[async_trait]
impl<T: LedgerWriter + ?Sized> LedgerWriter for Arc<T> {
    async fn append(
        &self,
        payload: EventPayload,
        fence: Option<AppendFence>,
    ) -> Result<EventRef, LedgerError> {
        (**self).append(payload, fence).await
    }
}
