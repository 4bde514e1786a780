use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for the gateway-backed metadata store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Ordered list of read gateway base URLs, tried first to last.
    pub gateways: Vec<String>,
    /// Write endpoint for uploads. `None` means uploads are disabled;
    /// the explicit in-memory store is the only development fallback.
    pub write_endpoint: Option<String>,
    /// Bearer token presented to the write endpoint.
    pub api_token: Option<String>,
    /// Per-gateway budget for a single fetch attempt.
    pub gateway_timeout: Duration,
    /// How long a fetched payload stays cached before a real re-fetch.
    pub cache_ttl: Duration,
    /// Upload size limit, in bytes.
    pub max_payload_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            gateways: vec![
                "https://ipfs.io/ipfs".into(),
                "https://dweb.link/ipfs".into(),
                "https://cloudflare-ipfs.com/ipfs".into(),
            ],
            write_endpoint: None,
            api_token: None,
            gateway_timeout: Duration::from_secs(8),
            cache_ttl: Duration::from_secs(300),
            max_payload_bytes: 8 * 1024 * 1024,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(raw: &str) -> StoreResult<Self> {
        toml::from_str(raw).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Whether uploads can reach a real write endpoint.
    pub fn can_upload(&self) -> bool {
        self.write_endpoint.is_some()
    }
}
