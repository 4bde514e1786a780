//! Ledger event boundary for the Harvest Provenance Ledger (HPL).
//!
//! The ledger itself is an external collaborator: an opaque, already-
//! consistent append-only log. This crate provides:
//! - Event payloads and the sequence-stamped envelope
//! - `EventFilter` with client-side matching (the ledger is only assumed
//!   to support full range scans)
//! - `LedgerReader` / `LedgerWriter` trait boundaries
//! - `InMemoryLedger` implementation for tests and embedding, including
//!   optimistic append fencing
//! - `RetryingReader` with bounded backoff for flaky ledger endpoints

pub mod error;
pub mod event;
pub mod memory;
pub mod retry;
pub mod traits;

pub use error::LedgerError;
pub use event::{AppendFence, EventFilter, EventKind, EventPayload, LedgerEvent};
pub use memory::InMemoryLedger;
pub use retry::{RetryPolicy, RetryingReader};
pub use traits::{LedgerReader, LedgerWriter};
