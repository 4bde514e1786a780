use hpl_types::ContentRef;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{MetadataStore, PayloadKind};

use async_trait::async_trait;

/// Production metadata store client.
///
/// Reads walk the configured gateway list in order with a bounded
/// per-gateway budget, caching the first success; writes go to the single
/// configured write endpoint. There is no implicit local fallback on either
/// path: when the network fails, callers get a typed error.
pub struct GatewayStore {
    config: StoreConfig,
    http: reqwest::Client,
    cache: TtlCache,
}

impl GatewayStore {
    pub fn new(config: StoreConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl);
        Self {
            config,
            http: reqwest::Client::new(),
            cache,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Drop a cached payload, forcing the next fetch onto the network.
    pub fn invalidate(&self, reference: &ContentRef) {
        self.cache.invalidate(reference);
    }

    async fn fetch_from_gateway(
        &self,
        gateway: &str,
        reference: &ContentRef,
    ) -> StoreResult<Vec<u8>> {
        let url = format!("{}/{}", gateway.trim_end_matches('/'), reference);

        let response = self
            .http
            .get(&url)
            .timeout(self.config.gateway_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Timeout {
                        gateway: gateway.to_string(),
                        budget: self.config.gateway_timeout,
                    }
                } else {
                    StoreError::Gateway {
                        gateway: gateway.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(StoreError::Gateway {
                gateway: gateway.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| StoreError::Gateway {
            gateway: gateway.to_string(),
            reason: format!("body read failed: {e}"),
        })?;

        if bytes.is_empty() {
            return Err(StoreError::Malformed {
                gateway: gateway.to_string(),
                reason: "empty payload".into(),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl MetadataStore for GatewayStore {
    async fn upload(&self, bytes: &[u8], kind: PayloadKind) -> StoreResult<ContentRef> {
        let Some(endpoint) = self.config.write_endpoint.as_deref() else {
            return Err(StoreError::MissingCredentials);
        };

        if bytes.len() > self.config.max_payload_bytes {
            return Err(StoreError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.config.max_payload_bytes,
            });
        }

        let file_name = match kind {
            PayloadKind::Json => "metadata.json",
            PayloadKind::Image => "image",
        };
        let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.http.post(endpoint).multipart(form);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| StoreError::WriteFailed {
            reason: format!("upload request failed: {e}"),
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::Unauthorized);
        }
        if status == reqwest::StatusCode::PAYLOAD_TOO_LARGE {
            return Err(StoreError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.config.max_payload_bytes,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::WriteFailed {
                reason: format!("upload failed ({status}): {body}"),
            });
        }

        // The write endpoint reports the assigned reference in the "Hash"
        // field of its JSON response.
        let body: serde_json::Value =
            response.json().await.map_err(|e| StoreError::WriteFailed {
                reason: format!("upload response parse failed: {e}"),
            })?;
        let hash = body["Hash"].as_str().ok_or_else(|| StoreError::WriteFailed {
            reason: "upload response missing 'Hash' field".into(),
        })?;

        let reference = ContentRef::parse(hash)?;
        debug!(reference = %reference, size = bytes.len(), "uploaded payload");
        self.cache.insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    async fn fetch(&self, reference: &ContentRef) -> StoreResult<Vec<u8>> {
        if let Some(bytes) = self.cache.get(reference) {
            debug!(reference = %reference, "metadata cache hit");
            return Ok(bytes);
        }

        if self.config.gateways.is_empty() {
            return Err(StoreError::NoGateways);
        }

        let mut last_error = None;
        let mut attempts = 0usize;

        for gateway in &self.config.gateways {
            attempts += 1;
            match self.fetch_from_gateway(gateway, reference).await {
                Ok(bytes) => {
                    self.cache.insert(reference.clone(), bytes.clone());
                    return Ok(bytes);
                }
                Err(e) => {
                    warn!(gateway = %gateway, reference = %reference, error = %e,
                        "gateway fetch failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(StoreError::AllGatewaysFailed {
            attempts,
            last: Box::new(last_error.unwrap_or(StoreError::NoGateways)),
        })
    }
}
