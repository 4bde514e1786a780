//! Foundation types for the Harvest Provenance Ledger (HPL).
//!
//! This crate provides the identity, lifecycle, and record types used
//! throughout the HPL system. Every other HPL crate depends on `hpl-types`.
//!
//! # Key Types
//!
//! - [`BatchId`] — Unique, time-ordered batch identifier assigned at mint
//! - [`ActorId`] — Opaque account identity of a supply-chain party
//! - [`ContentRef`] — Content hash pointing into the metadata store
//! - [`EventRef`] — Ledger transaction reference for an appended event
//! - [`BatchState`] — Forward-only lifecycle state of a batch
//! - [`Role`] — Supply-chain role of an actor
//! - [`Batch`] / [`BatchDraft`] — The tracked physical-goods entity
//! - [`ProvenanceStep`] / [`ProvenanceRecord`] — Event and materialized view

pub mod batch;
pub mod content;
pub mod details;
pub mod error;
pub mod identity;
pub mod record;
pub mod role;
pub mod state;
pub mod step;

pub use batch::{Batch, BatchDraft, BatchId, MintLimits};
pub use content::ContentRef;
pub use details::{BatchDetails, DetailAttribute};
pub use error::{ErrorKind, TypeError, ValidationError};
pub use identity::{ActorId, EventRef};
pub use record::ProvenanceRecord;
pub use role::Role;
pub use state::BatchState;
pub use step::{ProvenanceStep, StepDraft};
