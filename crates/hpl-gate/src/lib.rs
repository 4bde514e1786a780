//! Transfer authorization and lifecycle state machine for the Harvest
//! Provenance Ledger (HPL).
//!
//! The gate is a pure decision layer: given a materialized provenance
//! record, the acting party's role, and a requested transition, it either
//! constructs the step payload to append or rejects with a typed error.
//! It performs no I/O and commits nothing — the write path (wallet
//! rejection, balance, ledger congestion) fails independently, so keeping
//! the gate pure makes every decision testable without a live ledger.
//!
//! Transition legality is a data-driven routing table
//! ([`policy::ROUTES`]), not a type hierarchy.

pub mod error;
pub mod gate;
pub mod policy;

pub use error::GateError;
pub use gate::{authorize_transfer, initialize, mark_consumed, TransferRequest};
pub use policy::{implied_state, next_state, TransferRoute, ROUTES};
