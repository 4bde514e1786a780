use std::time::Duration;

use hpl_types::ErrorKind;

/// Errors from metadata store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No write endpoint is configured; uploads require explicit
    /// credentials (the in-memory store is the only sanctioned fallback).
    #[error("no write endpoint configured for uploads")]
    MissingCredentials,

    /// The write endpoint refused the configured credentials.
    #[error("write endpoint rejected credentials")]
    Unauthorized,

    /// The payload exceeds the configured upload limit.
    #[error("payload too large: {size} bytes exceeds limit of {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    /// A single gateway failed (HTTP error or transport fault).
    #[error("gateway {gateway} failed: {reason}")]
    Gateway { gateway: String, reason: String },

    /// A single gateway exceeded its per-request budget.
    #[error("gateway {gateway} timed out after {budget:?}")]
    Timeout { gateway: String, budget: Duration },

    /// A gateway responded but the payload was unusable.
    #[error("gateway {gateway} returned malformed payload: {reason}")]
    Malformed { gateway: String, reason: String },

    /// Every configured gateway failed; carries the final failure.
    #[error("all {attempts} gateways failed, last: {last}")]
    AllGatewaysFailed {
        attempts: usize,
        #[source]
        last: Box<StoreError>,
    },

    /// No gateways are configured at all.
    #[error("no gateways configured")]
    NoGateways,

    /// The write endpoint failed for a reason other than auth or size.
    #[error("upload failed: {reason}")]
    WriteFailed { reason: String },

    /// The requested reference is not present (in-memory store only).
    #[error("content not found: {0}")]
    NotFound(hpl_types::ContentRef),

    /// The store returned a reference HPL cannot represent.
    #[error("invalid content reference: {0}")]
    Ref(#[from] hpl_types::TypeError),

    /// The store configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Stable classification tag.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PayloadTooLarge { .. } | Self::Ref(_) | Self::Config(_) => {
                ErrorKind::Validation
            }
            Self::Unauthorized | Self::MissingCredentials => ErrorKind::Authorization,
            _ => ErrorKind::Network,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_classified() {
        assert_eq!(
            StoreError::PayloadTooLarge { size: 9, limit: 1 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(StoreError::Unauthorized.kind(), ErrorKind::Authorization);
        assert_eq!(StoreError::NoGateways.kind(), ErrorKind::Network);
        assert_eq!(
            StoreError::AllGatewaysFailed {
                attempts: 3,
                last: Box::new(StoreError::NoGateways),
            }
            .kind(),
            ErrorKind::Network
        );
    }

    #[test]
    fn all_gateways_failed_reports_last_error() {
        let err = StoreError::AllGatewaysFailed {
            attempts: 2,
            last: Box::new(StoreError::Timeout {
                gateway: "https://gw.example".into(),
                budget: Duration::from_secs(8),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("all 2 gateways failed"));
        assert!(message.contains("gw.example"));
    }
}
