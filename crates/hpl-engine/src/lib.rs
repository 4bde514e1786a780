//! Event-replay reconstruction engine for the Harvest Provenance Ledger
//! (HPL).
//!
//! The ledger exposes only "append an event" and "scan raw events"; there
//! is no queryable view of a batch's current state. This crate rebuilds
//! that view the deliberate poor-man's-database way: load the event stream
//! once, fold it once, and hand back immutable derived values. Nothing here
//! caches a `ProvenanceRecord` between calls — staleness is handled by
//! re-replaying, not by invalidation protocols.
//!
//! # Components
//!
//! - [`replay`] — the pure fold from ordered steps to a record
//! - [`ReconstructionEngine`] — provenance histories, the full batch
//!   catalog (tolerant of per-item metadata failure), and actor indexes
//! - [`RoleCache`] — local projection of role-grant events with explicit
//!   refresh/invalidate; a UX optimization, never a security boundary

pub mod engine;
pub mod error;
pub mod replay;
pub mod roles;

pub use engine::{BatchProvenance, Catalog, CatalogEntry, Hydration, ReconstructionEngine};
pub use error::EngineError;
pub use replay::replay;
pub use roles::RoleCache;
