//! Content-addressed metadata store client for the Harvest Provenance
//! Ledger (HPL).
//!
//! Descriptive batch metadata (JSON documents, images) lives outside the
//! ledger in a content-addressed storage network, referenced by hash. Any
//! single gateway of that network may be slow, unreachable, or serve
//! malformed data, so the client here treats the configured gateway list as
//! an ordered failover chain and caches successful fetches for a short TTL.
//!
//! # Components
//!
//! - [`MetadataStore`] — the trait boundary (`upload` / `fetch`)
//! - [`GatewayStore`] — production client: ordered gateway failover with
//!   bounded per-gateway timeouts, TTL read cache, authenticated uploads
//! - [`InMemoryMetadataStore`] — explicit development fallback; never
//!   selected implicitly
//! - [`TtlCache`] — concurrent read cache keyed by content reference
//!
//! # Design Rules
//!
//! 1. A cache miss or expired entry always falls back to a real fetch.
//! 2. Fetch never invents placeholder data; all-gateway failure is an error.
//! 3. Upload never silently degrades to local-only mode when credentials
//!    are configured but a request fails.

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod traits;

pub use cache::TtlCache;
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use gateway::GatewayStore;
pub use memory::InMemoryMetadataStore;
pub use traits::{MetadataStore, PayloadKind};
