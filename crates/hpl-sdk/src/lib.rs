//! High-level SDK for the Harvest Provenance Ledger (HPL).
//!
//! [`ProvenanceClient`] composes the ledger boundary, the metadata store,
//! the authorization gate, and the reconstruction engine into the
//! read-reconstruct-decide-append flow described by the rest of the
//! workspace: reconstruct a record, gate the intent against it, append the
//! step through the ledger collaborator, and re-reconstruct on the next
//! read. Appends are fenced; a fence rejection triggers exactly one
//! re-reconstruct-and-retry before surfacing a conflict.

pub mod client;
pub mod error;

pub use client::ProvenanceClient;
pub use error::{SdkError, SdkResult};

pub use hpl_engine::{BatchProvenance, Catalog, CatalogEntry, Hydration};
pub use hpl_gate::TransferRequest;
pub use hpl_types::{
    ActorId, Batch, BatchDetails, BatchDraft, BatchId, BatchState, ContentRef, EventRef,
    MintLimits, ProvenanceRecord, ProvenanceStep, Role,
};
